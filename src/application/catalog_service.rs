use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{Product, ProductDraft, ProductStats, Visibility};

pub struct CatalogService<R> {
    repo: R,
}

impl<R: ProductRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list(&self, visibility: Visibility) -> Result<Vec<Product>, DomainError> {
        self.repo.list(visibility == Visibility::Public)
    }

    /// Out-of-stock products are hidden from public callers.
    pub fn get(&self, id: Uuid, visibility: Visibility) -> Result<Product, DomainError> {
        self.repo
            .find_by_id(id)?
            .filter(|p| visibility == Visibility::Admin || p.in_stock)
            .ok_or(DomainError::NotFound("Product not found"))
    }

    pub fn create(&self, draft: ProductDraft) -> Result<Uuid, DomainError> {
        let product = draft.validate()?;
        let id = self.repo.create(product)?;
        log::info!("Product created with ID: {}", id);
        Ok(id)
    }

    pub fn update(&self, id: Uuid, draft: ProductDraft) -> Result<(), DomainError> {
        let product = draft.validate()?;
        if !self.repo.update(id, product)? {
            return Err(DomainError::NotFound("Product not found"));
        }
        log::info!("Product {} updated", id);
        Ok(())
    }

    pub fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.repo.delete(id)? {
            return Err(DomainError::NotFound("Product not found"));
        }
        log::info!("Product {} deleted", id);
        Ok(())
    }

    pub fn stats(&self) -> Result<ProductStats, DomainError> {
        self.repo.stats()
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::application::fakes::FakeProducts;
    use crate::domain::product::RawAmount;

    fn draft(name: &str, in_stock: bool) -> ProductDraft {
        ProductDraft {
            name: Some(name.into()),
            description: Some("House special".into()),
            price: Some(RawAmount::Text("110".into())),
            offer_price: None,
            category: Some("South Indian".into()),
            image: Some("/img/plate.png".into()),
            in_stock: Some(in_stock),
        }
    }

    fn service() -> CatalogService<FakeProducts> {
        CatalogService::new(FakeProducts::default())
    }

    #[test]
    fn public_listing_hides_out_of_stock() {
        let catalog = service();
        catalog.create(draft("Sambar Rice", true)).unwrap();
        catalog.create(draft("Idli", false)).unwrap();

        let public = catalog.list(Visibility::Public).unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].name, "Sambar Rice");
        assert_eq!(catalog.list(Visibility::Admin).unwrap().len(), 2);
    }

    #[test]
    fn public_get_hides_out_of_stock() {
        let catalog = service();
        let id = catalog.create(draft("Idli", false)).unwrap();

        assert!(matches!(
            catalog.get(id, Visibility::Public),
            Err(DomainError::NotFound(_))
        ));
        assert_eq!(catalog.get(id, Visibility::Admin).unwrap().name, "Idli");
    }

    #[test]
    fn create_rejects_invalid_draft() {
        let catalog = service();
        let mut bad = draft("Vada", true);
        bad.category = None;
        match catalog.create(bad) {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, "Missing required field: category"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(catalog.list(Visibility::Admin).unwrap().is_empty());
    }

    #[test]
    fn update_replaces_fields() {
        let catalog = service();
        let id = catalog.create(draft("Sambar Rice", true)).unwrap();
        let mut changed = draft("Sambar Rice Combo", false);
        changed.price = Some(RawAmount::Number(130.into()));
        catalog.update(id, changed).unwrap();

        let product = catalog.get(id, Visibility::Admin).unwrap();
        assert_eq!(product.name, "Sambar Rice Combo");
        assert_eq!(product.price, BigDecimal::from(130));
        assert!(!product.in_stock);
    }

    #[test]
    fn update_and_delete_unknown_ids_are_not_found() {
        let catalog = service();
        assert!(matches!(
            catalog.update(Uuid::new_v4(), draft("Ghost", true)),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            catalog.delete(Uuid::new_v4()),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn stats_count_stock_levels() {
        let catalog = service();
        catalog.create(draft("A", true)).unwrap();
        catalog.create(draft("B", true)).unwrap();
        let c = catalog.create(draft("C", false)).unwrap();

        let stats = catalog.stats().unwrap();
        assert_eq!(
            stats,
            ProductStats {
                total_products: 3,
                in_stock_products: 2,
                out_of_stock_products: 1
            }
        );

        catalog.delete(c).unwrap();
        assert_eq!(catalog.stats().unwrap().out_of_stock_products, 0);
    }
}
