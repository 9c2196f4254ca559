//! Postgres 文档存储实现
//!
//! 设计要点：
//! - 查询通过 QueryBuilder 组装，所有值参数化
//! - 单文档写入为单条语句

use crate::document::{Direction, Document, FilterOp, Query};
use crate::error::StorageError;
use crate::traits::DocumentStore;
use crate::validation::{ensure_collection, ensure_document_id, ensure_field_path};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

const CREATE_TABLE: &str = "create table if not exists documents (\
     collection text not null, \
     doc_id text not null, \
     body jsonb not null default '{}'::jsonb, \
     created_at timestamptz not null default now(), \
     primary key (collection, doc_id))";

const CREATE_INDEX: &str =
    "create index if not exists idx_documents_body on documents using gin (body)";

pub struct PgDocumentStore {
    pub pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 通过数据库 URL 建立连接池
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }

    /// 幂等创建文档表与索引
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
        Ok(())
    }
}

fn field_path(field: &str) -> Vec<String> {
    field.split('.').map(str::to_string).collect()
}

/// 追加 `collection = $1` 与全部过滤条件
fn push_conditions(
    builder: &mut QueryBuilder<'_, Postgres>,
    collection: &str,
    query: &Query,
) -> Result<(), StorageError> {
    builder.push(" where collection = ");
    builder.push_bind(collection.to_string());
    for filter in &query.filters {
        ensure_field_path(&filter.field)?;
        let path = field_path(&filter.field);
        match filter.op {
            FilterOp::Eq => {
                builder.push(" and body #> ");
                builder.push_bind(path);
                builder.push("::text[] = ");
                builder.push_bind(Json(filter.value.clone()));
            }
            FilterOp::In => {
                if !filter.value.is_array() {
                    return Err(StorageError::new("in filter requires an array value"));
                }
                builder.push(" and ");
                builder.push_bind(Json(filter.value.clone()));
                builder.push(" @> jsonb_build_array(body #> ");
                builder.push_bind(path.clone());
                builder.push("::text[]) and body #> ");
                builder.push_bind(path);
                builder.push("::text[] is not null");
            }
            FilterOp::Gte | FilterOp::Lte => {
                let operator = if filter.op == FilterOp::Gte { " >= " } else { " <= " };
                builder.push(" and ");
                match &filter.value {
                    Value::String(text) => {
                        builder.push("(body #>> ");
                        builder.push_bind(path);
                        builder.push("::text[]) collate \"C\"");
                        builder.push(operator);
                        builder.push_bind(text.clone());
                    }
                    other => {
                        builder.push("body #> ");
                        builder.push_bind(path);
                        builder.push("::text[]");
                        builder.push(operator);
                        builder.push_bind(Json(other.clone()));
                    }
                }
            }
        }
    }
    Ok(())
}

fn row_to_document(row: &sqlx::postgres::PgRow) -> Result<Document, StorageError> {
    let id: String = row.try_get("doc_id")?;
    let Json(body): Json<Value> = row.try_get("body")?;
    match body {
        Value::Object(data) => Ok(Document::new(id, data)),
        _ => Err(StorageError::new(format!("document {id} is not an object"))),
    }
}

#[async_trait::async_trait]
impl DocumentStore for PgDocumentStore {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StorageError> {
        ensure_collection(collection)?;
        let mut builder = QueryBuilder::<Postgres>::new("select doc_id, body from documents");
        push_conditions(&mut builder, collection, query)?;
        match &query.order_by {
            Some(order) => {
                ensure_field_path(&order.field)?;
                builder.push(" order by body #> ");
                builder.push_bind(field_path(&order.field));
                builder.push(match order.direction {
                    Direction::Asc => "::text[] asc nulls last, doc_id",
                    Direction::Desc => "::text[] desc nulls last, doc_id",
                });
            }
            None => {
                builder.push(" order by doc_id");
            }
        }
        if let Some(limit) = query.limit {
            builder.push(" limit ");
            builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_document).collect()
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StorageError> {
        ensure_collection(collection)?;
        ensure_document_id(id)?;
        let row = sqlx::query(
            "select doc_id, body from documents where collection = $1 and doc_id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        row_to_document(&row).map(Some)
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<(), StorageError> {
        ensure_collection(collection)?;
        ensure_document_id(id)?;
        sqlx::query(
            "insert into documents (collection, doc_id, body) values ($1, $2, $3) \
             on conflict (collection, doc_id) do update set body = excluded.body",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(Value::Object(data)))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<bool, StorageError> {
        ensure_collection(collection)?;
        ensure_document_id(id)?;
        let result = sqlx::query(
            "update documents set body = body || $3 where collection = $1 and doc_id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(Value::Object(patch)))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> Result<bool, StorageError> {
        ensure_collection(collection)?;
        ensure_document_id(id)?;
        ensure_field_path(field)?;
        let result = sqlx::query(
            "update documents set body = jsonb_set(body, array[$3::text], \
               coalesce(body -> $3::text, '[]'::jsonb) || coalesce(( \
                 select jsonb_agg(e) from jsonb_array_elements($4) e \
                 where not coalesce(body -> $3::text, '[]'::jsonb) @> jsonb_build_array(e) \
               ), '[]'::jsonb), true) \
             where collection = $1 and doc_id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(Json(Value::Array(values)))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn array_replace(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: &Value,
        replacement: Value,
    ) -> Result<bool, StorageError> {
        ensure_collection(collection)?;
        ensure_document_id(id)?;
        ensure_field_path(field)?;
        let result = sqlx::query(
            "update documents set body = jsonb_set(body, array[$3::text, ( \
               select (e.idx - 1)::text from jsonb_array_elements(body -> $3::text) \
                 with ordinality as e(value, idx) \
               where e.value = $4 order by e.idx limit 1 \
             )], $5, false) \
             where collection = $1 and doc_id = $2 \
               and jsonb_typeof(body -> $3::text) = 'array' \
               and exists (select 1 from jsonb_array_elements(body -> $3::text) e where e = $4)",
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(Json(expected.clone()))
        .bind(Json(replacement))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, collection: &str, query: &Query) -> Result<u64, StorageError> {
        ensure_collection(collection)?;
        let mut builder = QueryBuilder::<Postgres>::new("select count(*) as total from documents");
        push_conditions(&mut builder, collection, query)?;
        let row = builder.build().fetch_one(&self.pool).await?;
        let total: i64 = row.try_get("total")?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}
