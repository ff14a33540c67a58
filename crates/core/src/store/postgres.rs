use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::bookings::{Booking, BookingTotals, TimeWindow, User, UserCredentials};
use crate::catalog::{ContentFilter, Pagination, Service, ServiceFilter, ServiceId};
use crate::content::{ContentId, ContentItem, ContentItemDraft, ContentPatch};

use super::{ActivityStore, CatalogStore, StoreError};

const CONTENT_COLUMNS: &str = "id, content_type, title_en, title_hi, description_en, \
    description_hi, image_url, price, category, is_active, sort_order, created_at, updated_at";

const SERVICE_COLUMNS: &str = "id, name_en, name_hi, description_en, description_hi, category, \
    price, duration, image_url, benefits_en, benefits_hi, is_active, created_at";

const BOOKING_COLUMNS: &str =
    "id, user_email, service_id, service_name, amount, status, booking_date, created_at";

const USER_COLUMNS: &str = "id, email, name, phone, created_at";

/// PostgreSQL-backed store. Updates and deletes are single statements, so
/// each one is atomic per row.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct ContentRow {
    id: i64,
    content_type: String,
    title_en: String,
    title_hi: Option<String>,
    description_en: String,
    description_hi: Option<String>,
    image_url: Option<String>,
    price: Option<f64>,
    category: Option<String>,
    is_active: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for ContentItem {
    type Error = StoreError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        Ok(ContentItem {
            id: row.id,
            content_type: row
                .content_type
                .parse()
                .map_err(|e| StoreError::Malformed(format!("contents.{}: {e}", row.id)))?,
            title_en: row.title_en,
            title_hi: row.title_hi,
            description_en: row.description_en,
            description_hi: row.description_hi,
            image_url: row.image_url,
            price: row.price,
            category: row.category,
            is_active: row.is_active,
            order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ServiceRow {
    id: i64,
    name_en: String,
    name_hi: Option<String>,
    description_en: String,
    description_hi: Option<String>,
    category: String,
    price: f64,
    duration: i32,
    image_url: Option<String>,
    benefits_en: Vec<String>,
    benefits_hi: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ServiceRow> for Service {
    type Error = StoreError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let malformed = |what: String| StoreError::Malformed(format!("services.{id}: {what}"));
        Ok(Service {
            id: row.id,
            category: row.category.parse().map_err(|e| malformed(format!("{e}")))?,
            duration: u32::try_from(row.duration)
                .map_err(|_| malformed(format!("negative duration {}", row.duration)))?,
            name_en: row.name_en,
            name_hi: row.name_hi,
            description_en: row.description_en,
            description_hi: row.description_hi,
            price: row.price,
            image_url: row.image_url,
            benefits_en: row.benefits_en,
            benefits_hi: row.benefits_hi,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct BookingRow {
    id: i64,
    user_email: String,
    service_id: Option<i64>,
    service_name: String,
    amount: f64,
    status: String,
    booking_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            status: row
                .status
                .parse()
                .map_err(|e| StoreError::Malformed(format!("bookings.{}: {e}", row.id)))?,
            user_email: row.user_email,
            service_id: row.service_id,
            service_name: row.service_name,
            amount: row.amount,
            booking_date: row.booking_date,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: Option<String>,
    phone: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

fn window_bounds(window: Option<TimeWindow>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match window {
        Some(w) => (Some(w.from), Some(w.to)),
        None => (None, None),
    }
}

fn push_page(qb: &mut QueryBuilder<'_, Postgres>, page: Pagination) {
    qb.push(" LIMIT ")
        .push_bind(i64::from(page.limit))
        .push(" OFFSET ")
        .push_bind(i64::from(page.offset));
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_contents(
        &self,
        filter: &ContentFilter,
        page: Pagination,
    ) -> Result<Vec<ContentItem>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {CONTENT_COLUMNS} FROM contents WHERE TRUE"
        ));
        if filter.active_only {
            qb.push(" AND is_active");
        }
        if let Some(content_type) = filter.content_type {
            qb.push(" AND content_type = ")
                .push_bind(content_type.as_str());
        }
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        qb.push(" ORDER BY sort_order ASC, created_at ASC, id ASC");
        push_page(&mut qb, page);

        let rows: Vec<ContentRow> = qb.build_query_as::<ContentRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(ContentItem::try_from).collect()
    }

    async fn get_content(&self, id: ContentId) -> Result<Option<ContentItem>, StoreError> {
        let row: Option<ContentRow> = sqlx::query_as(&format!(
            "SELECT {CONTENT_COLUMNS} FROM contents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(ContentItem::try_from).transpose()
    }

    async fn insert_content(&self, draft: &ContentItemDraft) -> Result<ContentItem, StoreError> {
        let row: ContentRow = sqlx::query_as(&format!(
            "INSERT INTO contents (content_type, title_en, title_hi, description_en, \
             description_hi, image_url, price, category, is_active, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {CONTENT_COLUMNS}"
        ))
        .bind(draft.content_type.as_str())
        .bind(&draft.title_en)
        .bind(&draft.title_hi)
        .bind(&draft.description_en)
        .bind(&draft.description_hi)
        .bind(&draft.image_url)
        .bind(draft.price)
        .bind(&draft.category)
        .bind(draft.is_active)
        .bind(draft.order)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn update_content(
        &self,
        id: ContentId,
        patch: &ContentPatch,
    ) -> Result<Option<ContentItem>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE contents SET updated_at = now()");
        if let Some(v) = &patch.title_en {
            qb.push(", title_en = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.title_hi {
            qb.push(", title_hi = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.description_en {
            qb.push(", description_en = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.description_hi {
            qb.push(", description_hi = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.image_url {
            qb.push(", image_url = ").push_bind(v.clone());
        }
        if let Some(v) = patch.price {
            qb.push(", price = ").push_bind(v);
        }
        if let Some(v) = &patch.category {
            qb.push(", category = ").push_bind(v.clone());
        }
        if let Some(v) = patch.is_active {
            qb.push(", is_active = ").push_bind(v);
        }
        if let Some(v) = patch.order {
            qb.push(", sort_order = ").push_bind(v);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {CONTENT_COLUMNS}"));

        let row: Option<ContentRow> = qb.build_query_as::<ContentRow>().fetch_optional(&self.pool).await?;
        row.map(ContentItem::try_from).transpose()
    }

    async fn delete_content(&self, id: ContentId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_services(
        &self,
        filter: &ServiceFilter,
        page: Pagination,
    ) -> Result<Vec<Service>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE TRUE"
        ));
        if filter.active_only {
            qb.push(" AND is_active");
        }
        if let Some(category) = filter.category {
            qb.push(" AND category = ").push_bind(category.as_str());
        }
        qb.push(" ORDER BY created_at ASC, id ASC");
        push_page(&mut qb, page);

        let rows: Vec<ServiceRow> = qb.build_query_as::<ServiceRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(Service::try_from).collect()
    }

    async fn get_service(&self, id: ServiceId) -> Result<Option<Service>, StoreError> {
        let row: Option<ServiceRow> = sqlx::query_as(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Service::try_from).transpose()
    }

    async fn count_active_services(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE is_active")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl ActivityStore for PgStore {
    async fn list_bookings(&self, page: Pagination) -> Result<Vec<Booking>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC, id DESC"
        ));
        push_page(&mut qb, page);
        let rows: Vec<BookingRow> = qb.build_query_as::<BookingRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_users(&self, page: Pagination) -> Result<Vec<User>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
        ));
        push_page(&mut qb, page);
        let rows: Vec<UserRow> = qb.build_query_as::<UserRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn booking_totals(
        &self,
        window: Option<TimeWindow>,
    ) -> Result<BookingTotals, StoreError> {
        let (from, to) = window_bounds(window);
        let (count, revenue): (i64, f64) = sqlx::query_as(
            "SELECT COUNT(*), \
             COALESCE(SUM(amount) FILTER (WHERE status IN ('CONFIRMED', 'COMPLETED')), 0)::float8 \
             FROM bookings \
             WHERE ($1::timestamptz IS NULL OR created_at >= $1) \
             AND ($2::timestamptz IS NULL OR created_at < $2)",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(BookingTotals {
            count: count.max(0) as u64,
            revenue,
        })
    }

    async fn user_count(&self, window: Option<TimeWindow>) -> Result<u64, StoreError> {
        let (from, to) = window_bounds(window);
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users \
             WHERE ($1::timestamptz IS NULL OR created_at >= $1) \
             AND ($2::timestamptz IS NULL OR created_at < $2)",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.max(0) as u64)
    }

    async fn find_user_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT email, password_hash FROM users WHERE lower(email) = lower($1)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(email, password_hash)| UserCredentials {
            email,
            password_hash,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::BookingStatus;
    use crate::catalog::ServiceCategory;
    use crate::content::ContentType;
    use crate::test::db::TestDb;

    async fn store() -> PgStore {
        PgStore::new(TestDb::new().await.pool)
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn page(limit: u32, offset: u32) -> Pagination {
        Pagination { limit, offset }
    }

    fn ids(items: &[ContentItem]) -> Vec<ContentId> {
        items.iter().map(|i| i.id).collect()
    }

    async fn seed_service(
        store: &PgStore,
        name: &str,
        category: ServiceCategory,
        active: bool,
        created: &str,
    ) -> ServiceId {
        sqlx::query_scalar(
            "INSERT INTO services (name_en, description_en, category, price, duration, \
             benefits_en, benefits_hi, is_active, created_at) \
             VALUES ($1, 'Performed by the temple priests', $2, 251, 45, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(name)
        .bind(category.as_str())
        .bind(vec!["Peace".to_string(), "Prosperity".to_string()])
        .bind(vec!["शांति".to_string()])
        .bind(active)
        .bind(at(created))
        .fetch_one(store.pool())
        .await
        .unwrap()
    }

    async fn seed_booking(store: &PgStore, amount: f64, status: BookingStatus, created: &str) {
        sqlx::query(
            "INSERT INTO bookings (user_email, service_name, amount, status, booking_date, created_at) \
             VALUES ('devotee@example.com', 'Havan', $1, $2, $3, $3)",
        )
        .bind(amount)
        .bind(status.as_str())
        .bind(at(created))
        .execute(store.pool())
        .await
        .unwrap();
    }

    async fn seed_user(store: &PgStore, email: &str, created: &str) {
        sqlx::query("INSERT INTO users (email, password_hash, created_at) VALUES ($1, 'argon-hash', $2)")
            .bind(email)
            .bind(at(created))
            .execute(store.pool())
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "needs Docker for the PostgreSQL container"]
    async fn public_listing_never_shows_inactive_items() {
        let store = store().await;

        let mut aarti = ContentItemDraft::new(ContentType::ServiceCard, "Morning Aarti", "Sunrise aarti");
        aarti.category = Some("aarti".into());
        let aarti = store.insert_content(&aarti).await.unwrap();

        let mut retired =
            ContentItemDraft::new(ContentType::ServiceCard, "Retired Pooja", "No longer offered");
        retired.category = Some("aarti".into());
        retired.is_active = false;
        retired.order = 1;
        let retired = store.insert_content(&retired).await.unwrap();

        let public = ContentFilter {
            active_only: true,
            ..ContentFilter::default()
        };
        let listed = store.list_contents(&public, page(20, 0)).await.unwrap();
        assert_eq!(ids(&listed), vec![aarti.id]);

        let admin = store
            .list_contents(&ContentFilter::default(), page(20, 0))
            .await
            .unwrap();
        assert_eq!(ids(&admin), vec![aarti.id, retired.id]);

        for (content_type, category) in [
            (Some(ContentType::ServiceCard), Some("aarti")),
            (Some(ContentType::ServiceCard), None),
            (None, Some("aarti")),
        ] {
            let filter = ContentFilter {
                content_type,
                category: category.map(String::from),
                active_only: true,
            };
            let listed = store.list_contents(&filter, page(20, 0)).await.unwrap();
            assert!(!ids(&listed).contains(&retired.id), "{filter:?}");
        }
    }

    #[tokio::test]
    #[ignore = "needs Docker for the PostgreSQL container"]
    async fn listing_orders_by_position_then_creation_and_pages() {
        let store = store().await;
        let mut inserted = Vec::new();
        for (title, order) in [("Diwali", 3), ("Holi", 1), ("Navratri", 1), ("Janmashtami", 2)] {
            let mut draft = ContentItemDraft::new(ContentType::Event, title, "Festival");
            draft.order = order;
            inserted.push(store.insert_content(&draft).await.unwrap().id);
        }
        let (diwali, holi, navratri, janmashtami) = (inserted[0], inserted[1], inserted[2], inserted[3]);

        let all = store
            .list_contents(&ContentFilter::default(), page(20, 0))
            .await
            .unwrap();
        assert_eq!(ids(&all), vec![holi, navratri, janmashtami, diwali]);

        let window = store
            .list_contents(&ContentFilter::default(), page(2, 1))
            .await
            .unwrap();
        assert_eq!(ids(&window), vec![navratri, janmashtami]);

        let past_end = store
            .list_contents(&ContentFilter::default(), page(20, 10))
            .await
            .unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    #[ignore = "needs Docker for the PostgreSQL container"]
    async fn partial_patch_touches_only_given_fields() {
        let store = store().await;
        let mut draft = ContentItemDraft::new(ContentType::ShopProduct, "Brass Diya", "Hand-cast lamp");
        draft.title_hi = Some("पीतल दीया".into());
        draft.price = Some(350.0);
        draft.category = Some("lamps".into());
        draft.image_url = Some("https://img.example/diya.jpg".into());
        draft.order = 4;
        let before = store.insert_content(&draft).await.unwrap();

        let retitle = ContentPatch {
            title_en: Some("X".into()),
            ..ContentPatch::default()
        };
        let after = store.update_content(before.id, &retitle).await.unwrap().unwrap();
        assert_eq!(after.title_en, "X");
        assert_eq!(
            ContentItem {
                title_en: before.title_en.clone(),
                updated_at: before.updated_at,
                ..after.clone()
            },
            before
        );

        let clear = ContentPatch {
            title_hi: Some(None),
            price: Some(None),
            ..ContentPatch::default()
        };
        let cleared = store.update_content(before.id, &clear).await.unwrap().unwrap();
        assert_eq!(cleared.title_hi, None);
        assert_eq!(cleared.price, None);
        assert_eq!(cleared.title_en, "X");
        assert_eq!(cleared.category.as_deref(), Some("lamps"));
        assert_eq!(cleared.order, 4);

        assert_eq!(store.get_content(before.id).await.unwrap(), Some(cleared));
        assert!(store.update_content(before.id + 100, &retitle).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "needs Docker for the PostgreSQL container"]
    async fn deleted_items_stay_gone() {
        let store = store().await;
        let keep = store
            .insert_content(&ContentItemDraft::new(ContentType::Announcement, "Timings", "Open 5am"))
            .await
            .unwrap();
        let gone = store
            .insert_content(&ContentItemDraft::new(ContentType::GalleryImage, "Gopuram", "Tower"))
            .await
            .unwrap();

        assert!(store.delete_content(gone.id).await.unwrap());
        assert!(!store.delete_content(gone.id).await.unwrap());
        assert!(store.get_content(gone.id).await.unwrap().is_none());

        let listed = store
            .list_contents(&ContentFilter::default(), page(20, 0))
            .await
            .unwrap();
        assert_eq!(ids(&listed), vec![keep.id]);
    }

    #[tokio::test]
    #[ignore = "needs Docker for the PostgreSQL container"]
    async fn services_decode_benefits_and_filter() {
        let store = store().await;
        let aarti = seed_service(&store, "Sandhya Aarti", ServiceCategory::DailyAarti, true, "2025-03-01T00:00:00Z").await;
        let seva = seed_service(&store, "Annadanam", ServiceCategory::Seva, true, "2025-02-01T00:00:00Z").await;
        let paused = seed_service(&store, "Night Aarti", ServiceCategory::DailyAarti, false, "2025-01-01T00:00:00Z").await;

        let service = store.get_service(aarti).await.unwrap().unwrap();
        assert_eq!(service.category, ServiceCategory::DailyAarti);
        assert_eq!(service.benefits_en, vec!["Peace", "Prosperity"]);
        assert_eq!(service.benefits_hi, vec!["शांति"]);
        assert_eq!(service.duration, 45);

        let all: Vec<ServiceId> = store
            .list_services(&ServiceFilter::default(), page(20, 0))
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(all, vec![paused, seva, aarti]);

        let active_aarti = ServiceFilter {
            category: Some(ServiceCategory::DailyAarti),
            active_only: true,
        };
        let listed = store.list_services(&active_aarti, page(20, 0)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, aarti);

        assert_eq!(store.count_active_services().await.unwrap(), 2);
        assert!(store.get_service(paused + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "needs Docker for the PostgreSQL container"]
    async fn totals_use_half_open_windows_and_paid_statuses() {
        let store = store().await;
        seed_booking(&store, 500.0, BookingStatus::Completed, "2025-09-30T23:59:59Z").await;
        seed_booking(&store, 200.0, BookingStatus::Confirmed, "2025-10-01T00:00:00Z").await;
        seed_booking(&store, 300.0, BookingStatus::Completed, "2025-10-31T23:59:59Z").await;
        seed_booking(&store, 900.0, BookingStatus::Pending, "2025-10-15T00:00:00Z").await;
        seed_booking(&store, 100.0, BookingStatus::Cancelled, "2025-10-16T00:00:00Z").await;
        seed_booking(&store, 700.0, BookingStatus::Confirmed, "2025-11-01T00:00:00Z").await;

        let october = TimeWindow {
            from: at("2025-10-01T00:00:00Z"),
            to: at("2025-11-01T00:00:00Z"),
        };
        let totals = store.booking_totals(Some(october)).await.unwrap();
        assert_eq!(totals.count, 4);
        assert_eq!(totals.revenue, 500.0);

        let all = store.booking_totals(None).await.unwrap();
        assert_eq!(all.count, 6);
        assert_eq!(all.revenue, 1700.0);

        let empty = TimeWindow {
            from: at("2024-01-01T00:00:00Z"),
            to: at("2024-02-01T00:00:00Z"),
        };
        let none = store.booking_totals(Some(empty)).await.unwrap();
        assert_eq!(none.count, 0);
        assert_eq!(none.revenue, 0.0);

        seed_user(&store, "early@example.com", "2025-10-01T00:00:00Z").await;
        seed_user(&store, "late@example.com", "2025-11-01T00:00:00Z").await;
        assert_eq!(store.user_count(Some(october)).await.unwrap(), 1);
        assert_eq!(store.user_count(None).await.unwrap(), 2);
    }

    #[tokio::test]
    #[ignore = "needs Docker for the PostgreSQL container"]
    async fn activity_lists_newest_first_and_credentials_ignore_case() {
        let store = store().await;
        seed_booking(&store, 10.0, BookingStatus::Pending, "2025-01-01T00:00:00Z").await;
        seed_booking(&store, 20.0, BookingStatus::Confirmed, "2025-03-01T00:00:00Z").await;
        seed_booking(&store, 30.0, BookingStatus::Completed, "2025-02-01T00:00:00Z").await;

        let amounts: Vec<f64> = store
            .list_bookings(page(2, 0))
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.amount)
            .collect();
        assert_eq!(amounts, vec![20.0, 30.0]);

        seed_user(&store, "Sita@Example.com", "2025-01-01T00:00:00Z").await;
        seed_user(&store, "ram@example.com", "2025-06-01T00:00:00Z").await;
        let users = store.list_users(page(20, 0)).await.unwrap();
        assert_eq!(users[0].email, "ram@example.com");
        assert_eq!(users[1].email, "Sita@Example.com");

        let found = store.find_user_credentials("sita@EXAMPLE.com").await.unwrap().unwrap();
        assert_eq!(found.email, "Sita@Example.com");
        assert_eq!(found.password_hash, "argon-hash");
        assert!(store.find_user_credentials("nobody@example.com").await.unwrap().is_none());
    }
}
