use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, Product, ProductStats};
use crate::schema::products;

use super::models::{NewProductRow, ProductChangeset, ProductRow};

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            offer_price: row.offer_price,
            category: row.category,
            image: row.image,
            in_stock: row.in_stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn create(&self, product: NewProduct) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;
        let id = Uuid::new_v4();
        diesel::insert_into(products::table)
            .values(&NewProductRow {
                id,
                name: product.name,
                description: product.description,
                price: product.price,
                offer_price: product.offer_price,
                category: product.category,
                image: product.image,
                in_stock: product.in_stock,
            })
            .execute(&mut conn)?;
        Ok(id)
    }

    fn update(&self, id: Uuid, product: NewProduct) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let changed = diesel::update(products::table.find(id))
            .set(&ProductChangeset {
                name: product.name,
                description: product.description,
                price: product.price,
                offer_price: product.offer_price,
                category: product.category,
                image: product.image,
                in_stock: product.in_stock,
                updated_at: Utc::now(),
            })
            .execute(&mut conn)?;
        Ok(changed > 0)
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let removed = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        Ok(removed > 0)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = products::table
            .filter(products::id.eq_any(ids))
            .select(ProductRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn list(&self, in_stock_only: bool) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let mut query = products::table
            .select(ProductRow::as_select())
            .order(products::created_at.desc())
            .into_boxed();
        if in_stock_only {
            query = query.filter(products::in_stock.eq(true));
        }
        let rows = query.load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn stats(&self) -> Result<ProductStats, DomainError> {
        let mut conn = self.pool.get()?;
        let total: i64 = products::table.count().get_result(&mut conn)?;
        let in_stock: i64 = products::table
            .filter(products::in_stock.eq(true))
            .count()
            .get_result(&mut conn)?;
        Ok(ProductStats {
            total_products: total,
            in_stock_products: in_stock,
            out_of_stock_products: total - in_stock,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::infrastructure::test_db::setup_db;

    fn dish(name: &str, in_stock: bool) -> NewProduct {
        NewProduct {
            name: name.into(),
            description: format!("{name}, freshly made"),
            price: BigDecimal::from_str("120.00").expect("valid decimal"),
            offer_price: None,
            category: "North Indian".into(),
            image: "/img/dish.png".into(),
            in_stock,
        }
    }

    #[tokio::test]
    async fn create_and_find_by_id_roundtrip() {
        let (_container, pool) = setup_db().await;
        let repo = DieselProductRepository::new(pool);

        let id = repo.create(dish("Rajma Chawal", true)).expect("create failed");
        let product = repo
            .find_by_id(id)
            .expect("find failed")
            .expect("product should exist");

        assert_eq!(product.name, "Rajma Chawal");
        assert_eq!(product.price, BigDecimal::from(120));
        assert!(product.offer_price.is_none());
        assert!(product.in_stock);
    }

    #[tokio::test]
    async fn list_filters_stock_and_sorts_newest_first() {
        let (_container, pool) = setup_db().await;
        let repo = DieselProductRepository::new(pool);

        repo.create(dish("First", true)).expect("create failed");
        repo.create(dish("Hidden", false)).expect("create failed");
        repo.create(dish("Last", true)).expect("create failed");

        let public = repo.list(true).expect("list failed");
        assert_eq!(public.len(), 2);
        assert_eq!(public[0].name, "Last");

        assert_eq!(repo.list(false).expect("list failed").len(), 3);
    }

    #[tokio::test]
    async fn update_clears_offer_price_and_reports_missing_rows() {
        let (_container, pool) = setup_db().await;
        let repo = DieselProductRepository::new(pool);

        let mut with_offer = dish("Thali", true);
        with_offer.offer_price = Some(BigDecimal::from(99));
        let id = repo.create(with_offer).expect("create failed");

        assert!(repo.update(id, dish("Thali", false)).expect("update failed"));
        let product = repo.find_by_id(id).expect("find failed").expect("exists");
        assert!(product.offer_price.is_none());
        assert!(!product.in_stock);

        assert!(!repo
            .update(Uuid::new_v4(), dish("Ghost", true))
            .expect("update failed"));
    }

    #[tokio::test]
    async fn delete_and_stats() {
        let (_container, pool) = setup_db().await;
        let repo = DieselProductRepository::new(pool);

        let a = repo.create(dish("A", true)).expect("create failed");
        repo.create(dish("B", false)).expect("create failed");

        let stats = repo.stats().expect("stats failed");
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.in_stock_products, 1);
        assert_eq!(stats.out_of_stock_products, 1);

        assert!(repo.delete(a).expect("delete failed"));
        assert!(!repo.delete(a).expect("delete failed"));
        assert_eq!(repo.stats().expect("stats failed").total_products, 1);
    }

    #[tokio::test]
    async fn find_by_ids_returns_only_known_products() {
        let (_container, pool) = setup_db().await;
        let repo = DieselProductRepository::new(pool);

        let a = repo.create(dish("A", true)).expect("create failed");
        let found = repo
            .find_by_ids(&[a, Uuid::new_v4()])
            .expect("find failed");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, a);
    }
}
