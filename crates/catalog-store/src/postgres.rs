use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{BrandId, CategoryId, Page, PageRequest, ProductId};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, error::ErrorKind, postgres::PgRow};

use crate::{
    Brand, BrandFields, Category, CategoryFields, Owner, Product, ProductFields, ProductQuery,
    Result, StoreError, store::CatalogStore,
};

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.name, p.description, p.price, p.stock, p.code, p.image_url,
           p.created_at, p.active, p.category_id, p.brand_id,
           c.name AS category_name, b.name AS brand_name
    FROM products p
    JOIN categories c ON c.id = p.category_id
    JOIN brands b ON b.id = p.brand_id
"#;

/// PostgreSQL-backed catalog store implementation.
#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    /// Creates a new PostgreSQL catalog store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_category(row: PgRow) -> Result<Category> {
        Ok(Category {
            id: CategoryId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            active: row.try_get("active")?,
        })
    }

    fn row_to_brand(row: PgRow) -> Result<Brand> {
        Ok(Brand {
            id: BrandId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            country: row.try_get("country")?,
            website: row.try_get("website")?,
            active: row.try_get("active")?,
        })
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            stock: row.try_get("stock")?,
            code: row.try_get("code")?,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get("created_at")?,
            active: row.try_get("active")?,
            category_id: CategoryId::new(row.try_get("category_id")?),
            brand_id: BrandId::new(row.try_get("brand_id")?),
            category_name: row.try_get("category_name")?,
            brand_name: row.try_get("brand_name")?,
        })
    }

    /// Appends the WHERE clause for a product query. Only `products` columns are used,
    /// so the same filters serve both the joined select and the count.
    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ProductQuery) {
        builder.push(" WHERE 1=1");

        if let Some(id) = query.category_id {
            builder.push(" AND p.category_id = ").push_bind(id.as_i64());
        }
        if let Some(id) = query.brand_id {
            builder.push(" AND p.brand_id = ").push_bind(id.as_i64());
        }
        if let Some(ref fragment) = query.name_contains {
            builder
                .push(" AND strpos(lower(p.name), lower(")
                .push_bind(fragment.clone())
                .push(")) > 0");
        }
        if let Some(min) = query.min_price {
            builder.push(" AND p.price >= ").push_bind(min);
        }
        if let Some(max) = query.max_price {
            builder.push(" AND p.price <= ").push_bind(max);
        }
        if let Some(threshold) = query.stock_below {
            builder.push(" AND p.stock < ").push_bind(threshold);
        }
        if let Some(active) = query.active {
            builder.push(" AND p.active = ").push_bind(active);
        }
        if query.in_stock {
            builder.push(" AND p.stock > 0");
        }
    }

    fn push_order(builder: &mut QueryBuilder<'_, Postgres>, query: &ProductQuery) {
        builder
            .push(" ORDER BY ")
            .push(query.sort.field.order_expr())
            .push(" ")
            .push(query.sort.direction.as_sql())
            .push(", p.id ASC");
    }

    async fn fetch_product<'e, E>(executor: E, id: ProductId) -> Result<Option<Product>>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
            .bind(id.as_i64())
            .fetch_optional(executor)
            .await?;

        row.map(Self::row_to_product).transpose()
    }
}

/// Maps a failed write to a constraint violation when Postgres reports one.
fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && let Some(constraint) = db_err.constraint()
    {
        let constraint = constraint.to_string();
        match db_err.kind() {
            ErrorKind::UniqueViolation => return StoreError::UniqueViolation { constraint },
            ErrorKind::ForeignKeyViolation => {
                return StoreError::ForeignKeyViolation { constraint };
            }
            _ => {}
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn list_categories(&self, active_only: bool) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, active
            FROM categories
            WHERE active OR NOT $1
            ORDER BY id ASC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_category).collect()
    }

    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, description, active FROM categories WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_category).transpose()
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let row =
            sqlx::query("SELECT id, name, description, active FROM categories WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Self::row_to_category).transpose()
    }

    async fn insert_category(&self, fields: CategoryFields) -> Result<Category> {
        let row = sqlx::query(
            r#"
            INSERT INTO categories (name, description, active)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, active
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Self::row_to_category(row)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        fields: CategoryFields,
    ) -> Result<Option<Category>> {
        let row = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, description = $3, active = $4
            WHERE id = $1
            RETURNING id, name, description, active
            "#,
        )
        .bind(id.as_i64())
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(Self::row_to_category).transpose()
    }

    async fn delete_category(&self, id: CategoryId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_brands(&self, active_only: bool) -> Result<Vec<Brand>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, country, website, active
            FROM brands
            WHERE active OR NOT $1
            ORDER BY id ASC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_brand).collect()
    }

    async fn list_brands_by_country(&self, country: &str) -> Result<Vec<Brand>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, country, website, active
            FROM brands
            WHERE country = $1
            ORDER BY id ASC
            "#,
        )
        .bind(country)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_brand).collect()
    }

    async fn find_brand(&self, id: BrandId) -> Result<Option<Brand>> {
        let row =
            sqlx::query("SELECT id, name, country, website, active FROM brands WHERE id = $1")
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Self::row_to_brand).transpose()
    }

    async fn find_brand_by_name(&self, name: &str) -> Result<Option<Brand>> {
        let row =
            sqlx::query("SELECT id, name, country, website, active FROM brands WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Self::row_to_brand).transpose()
    }

    async fn insert_brand(&self, fields: BrandFields) -> Result<Brand> {
        let row = sqlx::query(
            r#"
            INSERT INTO brands (name, country, website, active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, country, website, active
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.country)
        .bind(&fields.website)
        .bind(fields.active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Self::row_to_brand(row)
    }

    async fn update_brand(&self, id: BrandId, fields: BrandFields) -> Result<Option<Brand>> {
        let row = sqlx::query(
            r#"
            UPDATE brands
            SET name = $2, country = $3, website = $4, active = $5
            WHERE id = $1
            RETURNING id, name, country, website, active
            "#,
        )
        .bind(id.as_i64())
        .bind(&fields.name)
        .bind(&fields.country)
        .bind(&fields.website)
        .bind(fields.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(Self::row_to_brand).transpose()
    }

    async fn delete_brand(&self, id: BrandId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let mut builder = QueryBuilder::<Postgres>::new(PRODUCT_SELECT);
        Self::push_filters(&mut builder, query);
        Self::push_order(&mut builder, query);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn page_products(
        &self,
        query: &ProductQuery,
        page: PageRequest,
    ) -> Result<Page<Product>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        Self::push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(PRODUCT_SELECT);
        Self::push_filters(&mut select, query);
        Self::push_order(&mut select, query);
        select
            .push(" LIMIT ")
            .push_bind(i64::try_from(page.size()).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = select.build().fetch_all(&self.pool).await?;
        let content = rows
            .into_iter()
            .map(Self::row_to_product)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(content, total.max(0) as u64, page))
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>> {
        Self::fetch_product(&self.pool, id).await
    }

    async fn find_product_by_code(&self, code: &str) -> Result<Option<Product>> {
        let row = sqlx::query(&format!("{PRODUCT_SELECT} WHERE p.code = $1"))
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn insert_product(
        &self,
        fields: ProductFields,
        created_at: DateTime<Utc>,
    ) -> Result<Product> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products
                (name, description, price, stock, code, image_url, created_at, active, category_id, brand_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.stock)
        .bind(&fields.code)
        .bind(&fields.image_url)
        .bind(created_at)
        .bind(fields.active)
        .bind(fields.category_id.as_i64())
        .bind(fields.brand_id.as_i64())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        let product = Self::fetch_product(&mut *tx, ProductId::new(id))
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;

        tx.commit().await?;
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, stock = $5, code = $6,
                image_url = $7, active = $8, category_id = $9, brand_id = $10
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.stock)
        .bind(&fields.code)
        .bind(&fields.image_url)
        .bind(fields.active)
        .bind(fields.category_id.as_i64())
        .bind(fields.brand_id.as_i64())
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let product = Self::fetch_product(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(product)
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_dependents(&self, owner: Owner) -> Result<u64> {
        let (sql, id) = match owner {
            Owner::Category(id) => (
                "SELECT COUNT(*) FROM products WHERE category_id = $1",
                id.as_i64(),
            ),
            Owner::Brand(id) => (
                "SELECT COUNT(*) FROM products WHERE brand_id = $1",
                id.as_i64(),
            ),
        };

        let count: i64 = sqlx::query_scalar(sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }
}
