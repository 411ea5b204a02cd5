//! Shipping address book.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{AddressInput, CurrentUser, ShippingAddress};
use crate::domain::repositories::{AddressRepository, ShippingRepository};
use crate::error::AppError;

pub struct AddressService {
    addresses: Arc<dyn AddressRepository>,
    shipping: Arc<dyn ShippingRepository>,
}

impl AddressService {
    pub fn new(addresses: Arc<dyn AddressRepository>, shipping: Arc<dyn ShippingRepository>) -> Self {
        Self {
            addresses,
            shipping,
        }
    }

    pub async fn list_addresses(&self, actor: &CurrentUser) -> Result<Vec<ShippingAddress>, AppError> {
        self.addresses.list_by_user(actor.id).await
    }

    /// Creates or updates one of the actor's addresses. Marking it default
    /// clears the flag on the others in the same transaction.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if `input.id` is not one of the actor's addresses
    /// - [`AppError::Conflict`] if an order ships to the address and anything
    ///   but its default flag would change
    /// - [`AppError::Validation`] for an unknown country
    pub async fn upsert_address(
        &self,
        actor: &CurrentUser,
        input: AddressInput,
    ) -> Result<ShippingAddress, AppError> {
        if let Some(id) = input.id {
            let existing = self.find_owned(actor, id).await?;
            if !existing.same_destination(&input)
                && self.addresses.is_used_by_orders(id).await?
            {
                return Err(AppError::conflict(
                    "Address is used by an order; add a new address instead",
                    json!({ "id": id }),
                ));
            }
        }

        if self
            .shipping
            .find_country_by_id(input.country_id)
            .await?
            .is_none()
        {
            return Err(AppError::bad_request(
                "Unknown country",
                json!({ "country_id": input.country_id }),
            ));
        }

        self.addresses.upsert(actor.id, input).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if an order ships to the address.
    pub async fn delete_address(&self, actor: &CurrentUser, id: i64) -> Result<(), AppError> {
        self.find_owned(actor, id).await?;

        if self.addresses.is_used_by_orders(id).await? {
            return Err(AppError::conflict(
                "Address is used by an order",
                json!({ "id": id }),
            ));
        }

        self.addresses.delete(id).await?;
        Ok(())
    }

    /// Another user's address is reported as missing rather than forbidden.
    pub async fn find_owned(&self, actor: &CurrentUser, id: i64) -> Result<ShippingAddress, AppError> {
        self.addresses
            .find_by_id(id)
            .await?
            .filter(|address| address.user_id == actor.id)
            .ok_or_else(|| AppError::not_found("Address not found", json!({ "id": id })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fixtures;
    use crate::domain::entities::Role;
    use crate::domain::repositories::{MockAddressRepository, MockShippingRepository};

    fn input(id: Option<i64>, country_id: i64) -> AddressInput {
        AddressInput {
            id,
            country_id,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone: "+15550001".to_string(),
            address1: "1 Main St".to_string(),
            address2: None,
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            is_default: true,
        }
    }

    #[tokio::test]
    async fn test_create_address() {
        let mut addresses = MockAddressRepository::new();
        addresses
            .expect_upsert()
            .withf(|user_id, input| *user_id == 3 && input.is_default)
            .times(1)
            .returning(|user_id, input| Ok(fixtures::address(1, user_id, input.country_id)));

        let mut shipping = MockShippingRepository::new();
        shipping
            .expect_find_country_by_id()
            .returning(|id| Ok(Some(fixtures::country(id, "US"))));

        let service = AddressService::new(Arc::new(addresses), Arc::new(shipping));

        let address = service
            .upsert_address(&fixtures::current_user(3, Role::User), input(None, 1))
            .await
            .unwrap();

        assert_eq!(address.user_id, 3);
    }

    #[tokio::test]
    async fn test_unknown_country_rejected() {
        let mut shipping = MockShippingRepository::new();
        shipping.expect_find_country_by_id().returning(|_| Ok(None));

        let service = AddressService::new(Arc::new(MockAddressRepository::new()), Arc::new(shipping));

        let err = service
            .upsert_address(&fixtures::current_user(3, Role::User), input(None, 999))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_cannot_touch_other_users_address() {
        let mut addresses = MockAddressRepository::new();
        addresses
            .expect_find_by_id()
            .returning(|id| Ok(Some(fixtures::address(id, 8, 1))));
        addresses.expect_delete().never();

        let service = AddressService::new(Arc::new(addresses), Arc::new(MockShippingRepository::new()));
        let actor = fixtures::current_user(3, Role::User);

        let err = service.delete_address(&actor, 5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let err = service.upsert_address(&actor, input(Some(5), 1)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    fn owned_address_repo(used: bool) -> MockAddressRepository {
        let mut addresses = MockAddressRepository::new();
        addresses
            .expect_find_by_id()
            .returning(|id| Ok(Some(fixtures::address(id, 3, 1))));
        addresses
            .expect_is_used_by_orders()
            .returning(move |_| Ok(used));
        addresses
    }

    #[tokio::test]
    async fn test_address_used_by_order_cannot_be_deleted() {
        let mut addresses = owned_address_repo(true);
        addresses.expect_delete().never();

        let service = AddressService::new(Arc::new(addresses), Arc::new(MockShippingRepository::new()));

        let err = service
            .delete_address(&fixtures::current_user(3, Role::User), 5)
            .await
            .unwrap_err();

        match err {
            AppError::Conflict { message, .. } => assert_eq!(message, "Address is used by an order"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unused_address_deleted() {
        let mut addresses = owned_address_repo(false);
        addresses.expect_delete().times(1).returning(|_| Ok(true));

        let service = AddressService::new(Arc::new(addresses), Arc::new(MockShippingRepository::new()));

        let result = service
            .delete_address(&fixtures::current_user(3, Role::User), 5)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_address_used_by_order_keeps_its_destination() {
        let mut addresses = owned_address_repo(true);
        addresses
            .expect_upsert()
            .times(1)
            .returning(|user_id, input| Ok(fixtures::address(input.id.unwrap_or(1), user_id, 1)));

        let mut shipping = MockShippingRepository::new();
        shipping
            .expect_find_country_by_id()
            .returning(|id| Ok(Some(fixtures::country(id, "US"))));

        let service = AddressService::new(Arc::new(addresses), Arc::new(shipping));
        let actor = fixtures::current_user(3, Role::User);

        let mut moved = input(Some(5), 1);
        moved.city = "Shelbyville".to_string();
        let err = service.upsert_address(&actor, moved).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));

        let mut default_only = input(Some(5), 1);
        default_only.is_default = false;
        assert!(service.upsert_address(&actor, default_only).await.is_ok());
    }
}
