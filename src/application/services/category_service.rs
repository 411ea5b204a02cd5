//! Category and subcategory management.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::application::services::auth_service::require_role;
use crate::domain::entities::{
    Category, CategoryInput, CurrentUser, Role, SubCategory, SubCategoryInput,
};
use crate::domain::repositories::CategoryRepository;
use crate::domain::slug::validate_url_segment;
use crate::error::AppError;

/// Admin-managed catalog taxonomy.
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.repository.list_categories().await
    }

    pub async fn get_category_by_url(&self, url: &str) -> Result<Category, AppError> {
        self.repository
            .find_category_by_url(url)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found", json!({ "url": url })))
    }

    pub async fn list_subcategories(
        &self,
        category_id: Option<i64>,
    ) -> Result<Vec<SubCategory>, AppError> {
        self.repository.list_subcategories(category_id).await
    }

    pub async fn get_subcategory_by_url(&self, url: &str) -> Result<SubCategory, AppError> {
        self.repository
            .find_subcategory_by_url(url)
            .await?
            .ok_or_else(|| AppError::not_found("Subcategory not found", json!({ "url": url })))
    }

    /// Creates the category, or updates it when `input.id` is set.
    ///
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] unless `actor` is an admin
    /// - [`AppError::Validation`] for an invalid name or url
    /// - [`AppError::Conflict`] if another category uses the name or url
    /// - [`AppError::NotFound`] when updating a missing category
    pub async fn upsert_category(
        &self,
        actor: &CurrentUser,
        mut input: CategoryInput,
    ) -> Result<Category, AppError> {
        require_role(actor, Role::Admin)?;

        input.name = input.name.trim().to_string();
        validate_name(&input.name)?;
        validate_url_segment(&input.url)?;

        if let Some(duplicate) = self
            .repository
            .find_category_duplicate(&input.name, &input.url, input.id)
            .await?
        {
            return Err(duplicate_error(
                &duplicate.name,
                &duplicate.url,
                &input.name,
                &input.url,
            ));
        }

        match input.id {
            Some(id) => self
                .repository
                .update_category(id, input)
                .await?
                .ok_or_else(|| AppError::not_found("Category not found", json!({ "id": id }))),
            None => {
                let category = self.repository.create_category(input).await?;
                info!(category_id = category.id, url = %category.url, "Category created");
                Ok(category)
            }
        }
    }

    pub async fn delete_category(&self, actor: &CurrentUser, id: i64) -> Result<(), AppError> {
        require_role(actor, Role::Admin)?;

        if !self.repository.delete_category(id).await? {
            return Err(AppError::not_found("Category not found", json!({ "id": id })));
        }

        info!(category_id = id, "Category deleted");
        Ok(())
    }

    /// Creates or updates a subcategory. Same rules as
    /// [`Self::upsert_category`], and the parent category must exist.
    pub async fn upsert_subcategory(
        &self,
        actor: &CurrentUser,
        mut input: SubCategoryInput,
    ) -> Result<SubCategory, AppError> {
        require_role(actor, Role::Admin)?;

        input.name = input.name.trim().to_string();
        validate_name(&input.name)?;
        validate_url_segment(&input.url)?;

        if self
            .repository
            .find_category_by_id(input.category_id)
            .await?
            .is_none()
        {
            return Err(AppError::bad_request(
                "Parent category does not exist",
                json!({ "category_id": input.category_id }),
            ));
        }

        if let Some(duplicate) = self
            .repository
            .find_subcategory_duplicate(&input.name, &input.url, input.id)
            .await?
        {
            return Err(duplicate_error(
                &duplicate.name,
                &duplicate.url,
                &input.name,
                &input.url,
            ));
        }

        match input.id {
            Some(id) => self
                .repository
                .update_subcategory(id, input)
                .await?
                .ok_or_else(|| AppError::not_found("Subcategory not found", json!({ "id": id }))),
            None => {
                let sub = self.repository.create_subcategory(input).await?;
                info!(sub_category_id = sub.id, url = %sub.url, "Subcategory created");
                Ok(sub)
            }
        }
    }

    pub async fn delete_subcategory(&self, actor: &CurrentUser, id: i64) -> Result<(), AppError> {
        require_role(actor, Role::Admin)?;

        if !self.repository.delete_subcategory(id).await? {
            return Err(AppError::not_found("Subcategory not found", json!({ "id": id })));
        }

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    let len = name.chars().count();
    if !(2..=50).contains(&len) {
        return Err(AppError::bad_request(
            "Name must be 2-50 characters",
            json!({ "provided_length": len }),
        ));
    }
    Ok(())
}

fn duplicate_error(existing_name: &str, existing_url: &str, name: &str, url: &str) -> AppError {
    let mut fields = Vec::new();
    if existing_name.eq_ignore_ascii_case(name) {
        fields.push("name");
    }
    if existing_url == url {
        fields.push("url");
    }

    AppError::conflict("Duplicate name/url", json!({ "fields": fields }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fixtures;
    use crate::domain::repositories::MockCategoryRepository;

    fn admin() -> CurrentUser {
        fixtures::current_user(1, Role::Admin)
    }

    fn input(id: Option<i64>) -> CategoryInput {
        CategoryInput {
            id,
            name: "  Shoes ".to_string(),
            url: "shoes".to_string(),
            image: "https://img.example.com/shoes.png".to_string(),
            featured: true,
        }
    }

    #[tokio::test]
    async fn test_create_category_trims_name() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo
            .expect_find_category_duplicate()
            .withf(|name, url, exclude| name == "Shoes" && url == "shoes" && exclude.is_none())
            .times(1)
            .returning(|_, _, _| Ok(None));

        mock_repo
            .expect_create_category()
            .times(1)
            .returning(|input| {
                let mut category = fixtures::category(5);
                category.name = input.name;
                category.url = input.url;
                Ok(category)
            });

        let service = CategoryService::new(Arc::new(mock_repo));

        let category = service.upsert_category(&admin(), input(None)).await.unwrap();

        assert_eq!(category.name, "Shoes");
        assert_eq!(category.id, 5);
    }

    #[tokio::test]
    async fn test_category_requires_admin() {
        let service = CategoryService::new(Arc::new(MockCategoryRepository::new()));

        let seller = fixtures::current_user(2, Role::Seller);
        let err = service.upsert_category(&seller, input(None)).await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_url_on_other_row_conflicts() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo
            .expect_find_category_duplicate()
            .withf(|_, _, exclude| *exclude == Some(3))
            .returning(|_, _, _| {
                let mut other = fixtures::category(4);
                other.url = "shoes".to_string();
                Ok(Some(other))
            });

        let service = CategoryService::new(Arc::new(mock_repo));

        let err = service
            .upsert_category(&admin(), input(Some(3)))
            .await
            .unwrap_err();

        match err {
            AppError::Conflict { message, details } => {
                assert_eq!(message, "Duplicate name/url");
                assert_eq!(details["fields"], json!(["url"]));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_missing_category() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_find_category_duplicate()
            .returning(|_, _, _| Ok(None));
        mock_repo
            .expect_update_category()
            .returning(|_, _| Ok(None));

        let service = CategoryService::new(Arc::new(mock_repo));

        let err = service
            .upsert_category(&admin(), input(Some(9)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let service = CategoryService::new(Arc::new(MockCategoryRepository::new()));

        let mut bad = input(None);
        bad.url = "Shoes & Boots".to_string();

        let err = service.upsert_category(&admin(), bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_subcategory_requires_existing_parent() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_find_category_by_id()
            .returning(|_| Ok(None));

        let service = CategoryService::new(Arc::new(mock_repo));

        let err = service
            .upsert_subcategory(
                &admin(),
                SubCategoryInput {
                    id: None,
                    category_id: 42,
                    name: "Sneakers".to_string(),
                    url: "sneakers".to_string(),
                    image: String::new(),
                    featured: false,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_category() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_delete_category()
            .with(mockall::predicate::eq(8))
            .returning(|_| Ok(false));

        let service = CategoryService::new(Arc::new(mock_repo));

        let err = service.delete_category(&admin(), 8).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
