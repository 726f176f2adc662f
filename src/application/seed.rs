//! Demo accounts and dishes for a fresh database.

use crate::domain::errors::DomainError;
use crate::domain::ports::{ProductRepository, UserRepository};
use crate::domain::product::{ProductDraft, RawAmount};
use crate::domain::user::Role;

use super::account_service::{AccountService, Registration};
use super::catalog_service::CatalogService;

pub const DEMO_ADMIN_EMAIL: &str = "admin@demo.com";

const DEMO_DISHES: &[(&str, &str, i64, &str)] = &[
    (
        "Rajma Chawal",
        "Traditional kidney beans curry with steamed rice, served with pickle and papad",
        120,
        "North Indian",
    ),
    (
        "Dal Tadka with Roti",
        "Yellow lentil curry with fresh wheat flatbread and butter",
        100,
        "North Indian",
    ),
    (
        "Sambar Rice",
        "South Indian lentil curry with rice, vegetables, and coconut chutney",
        110,
        "South Indian",
    ),
    (
        "Chole Bhature",
        "Spicy chickpea curry with fried bread, onions, and pickle",
        140,
        "North Indian",
    ),
    (
        "Paneer Butter Masala",
        "Creamy cottage cheese curry with basmati rice and naan",
        160,
        "North Indian",
    ),
    (
        "Vegetable Biryani",
        "Aromatic basmati rice with spiced vegetables and raita",
        180,
        "Biryani",
    ),
    (
        "Masala Dosa",
        "Crispy rice crepe with spiced potato filling, sambar, and chutneys",
        90,
        "South Indian",
    ),
    (
        "Aloo Gobi with Chapati",
        "Spiced potato and cauliflower curry with fresh wheat flatbread",
        95,
        "North Indian",
    ),
];

/// Inserts the demo admin, demo user, and sample dishes unless the demo
/// admin already exists. Returns whether anything was written.
pub fn seed_demo_data<U, P>(
    accounts: &AccountService<U>,
    catalog: &CatalogService<P>,
) -> Result<bool, DomainError>
where
    U: UserRepository,
    P: ProductRepository,
{
    if accounts.find_by_email(DEMO_ADMIN_EMAIL)?.is_some() {
        log::info!("Database already seeded");
        return Ok(false);
    }

    accounts.register(
        Registration {
            name: "Admin User".into(),
            email: DEMO_ADMIN_EMAIL.into(),
            password: "admin123".into(),
        },
        Role::Admin,
    )?;
    accounts.register(
        Registration {
            name: "Demo User".into(),
            email: "user@demo.com".into(),
            password: "user123".into(),
        },
        Role::User,
    )?;

    for (name, description, price, category) in DEMO_DISHES {
        catalog.create(ProductDraft {
            name: Some((*name).into()),
            description: Some((*description).into()),
            price: Some(RawAmount::Number((*price).into())),
            offer_price: None,
            category: Some((*category).into()),
            image: Some("/placeholder.svg?height=200&width=300".into()),
            in_stock: Some(true),
        })?;
    }

    log::info!("Seeded demo accounts and {} dishes", DEMO_DISHES.len());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fakes::{FakeProducts, FakeUsers};
    use crate::config::AuthConfig;
    use crate::domain::product::Visibility;

    #[test]
    fn seeding_is_idempotent() {
        let accounts = AccountService::new(FakeUsers::default(), AuthConfig::new("seed"));
        let catalog = CatalogService::new(FakeProducts::default());

        assert!(seed_demo_data(&accounts, &catalog).unwrap());
        assert!(!seed_demo_data(&accounts, &catalog).unwrap());

        assert_eq!(catalog.list(Visibility::Public).unwrap().len(), 8);
        let admin = accounts.login(DEMO_ADMIN_EMAIL, "admin123").unwrap();
        assert_eq!(admin.user.role, Role::Admin);
    }
}
