use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, Statement,
};
use serde_json::Value;

use nexza_console_schema::documents;

use crate::domain::repository::{Document, DocumentStore, FieldFilter};
use crate::error::ConsoleError;

const UPSERT_REPLACE: &str = r#"
INSERT INTO documents (collection, "key", fields, version, created_at, updated_at)
VALUES ($1, $2, $3, 1, $4, $4)
ON CONFLICT (collection, "key") DO UPDATE
SET fields = EXCLUDED.fields,
    version = documents.version + 1,
    updated_at = EXCLUDED.updated_at
"#;

const UPSERT_MERGE: &str = r#"
INSERT INTO documents (collection, "key", fields, version, created_at, updated_at)
VALUES ($1, $2, $3, 1, $4, $4)
ON CONFLICT (collection, "key") DO UPDATE
SET fields = documents.fields || EXCLUDED.fields,
    version = documents.version + 1,
    updated_at = EXCLUDED.updated_at
"#;

const UPDATE_MERGE: &str = r#"
UPDATE documents
SET fields = fields || $3, version = version + 1, updated_at = $4
WHERE collection = $1 AND "key" = $2
"#;

/// Document store over a single Postgres JSONB table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pub db: DatabaseConnection,
}

impl PgDocumentStore {
    pub async fn ping(&self) -> Result<(), ConsoleError> {
        self.db.ping().await.context("ping database")?;
        Ok(())
    }
}

impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, ConsoleError> {
        let model = documents::Entity::find_by_id((collection.to_owned(), key.to_owned()))
            .one(&self.db)
            .await
            .context("get document")?;
        Ok(model.map(document_from_model))
    }

    async fn set(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
        merge: bool,
    ) -> Result<(), ConsoleError> {
        let sql = if merge { UPSERT_MERGE } else { UPSERT_REPLACE };
        self.db
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                sql,
                [
                    collection.into(),
                    key.into(),
                    fields.into(),
                    Utc::now().into(),
                ],
            ))
            .await
            .context("set document")?;
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
    ) -> Result<bool, ConsoleError> {
        let result = self
            .db
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                UPDATE_MERGE,
                [
                    collection.into(),
                    key.into(),
                    fields.into(),
                    Utc::now().into(),
                ],
            ))
            .await
            .context("update document")?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<bool, ConsoleError> {
        let result = documents::Entity::delete_by_id((collection.to_owned(), key.to_owned()))
            .exec(&self.db)
            .await
            .context("delete document")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<Document>, ConsoleError> {
        let mut query = documents::Entity::find()
            .filter(documents::Column::Collection.eq(collection))
            .order_by_asc(documents::Column::CreatedAt);
        if let Some(filter) = filter {
            let mut probe = serde_json::Map::new();
            probe.insert(filter.field.clone(), filter.value.clone());
            query = query.filter(Expr::cust_with_values(
                "fields @> $1",
                [Value::Object(probe)],
            ));
        }
        let models = query.all(&self.db).await.context("list documents")?;
        Ok(models.into_iter().map(document_from_model).collect())
    }

    async fn create(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
    ) -> Result<bool, ConsoleError> {
        let now = Utc::now();
        let inserted = documents::Entity::insert(documents::ActiveModel {
            collection: Set(collection.to_owned()),
            key: Set(key.to_owned()),
            fields: Set(fields),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::columns([documents::Column::Collection, documents::Column::Key])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("create document")?;
        Ok(inserted == 1)
    }

    async fn compare_and_set(
        &self,
        collection: &str,
        key: &str,
        expected_version: i64,
        fields: Value,
    ) -> Result<bool, ConsoleError> {
        let result = documents::Entity::update_many()
            .col_expr(documents::Column::Fields, Expr::value(fields))
            .col_expr(
                documents::Column::Version,
                Expr::col(documents::Column::Version).add(1),
            )
            .col_expr(documents::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(documents::Column::Collection.eq(collection))
            .filter(documents::Column::Key.eq(key))
            .filter(documents::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .context("compare and set document")?;
        Ok(result.rows_affected == 1)
    }
}

fn document_from_model(model: documents::Model) -> Document {
    Document {
        key: model.key,
        fields: model.fields,
        version: model.version,
    }
}
