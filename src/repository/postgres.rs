use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{Store, StoreResult};
use crate::error::StoreError;
use crate::models::{
    City, CityId, Customer, CustomerId, Delivery, Driver, DriverDistance, DriverId,
    NewDelivery, Restaurant, RestaurantId,
};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const DELIVERY_SELECT: &str = "
    SELECT d.id, d.delivery_time, d.distance,
           dr.id AS driver_id, dr.name AS driver_name,
           dc.id AS driver_city_id, dc.name AS driver_city_name,
           r.id AS restaurant_id, r.name AS restaurant_name,
           r.description AS restaurant_description,
           rc.id AS restaurant_city_id, rc.name AS restaurant_city_name,
           c.id AS customer_id, c.name AS customer_name, c.description AS customer_description,
           cc.id AS customer_city_id, cc.name AS customer_city_name
    FROM deliveries d
    JOIN drivers dr ON dr.id = d.driver_id
    JOIN cities dc ON dc.id = dr.city_id
    JOIN restaurants r ON r.id = d.restaurant_id
    JOIN cities rc ON rc.id = r.city_id
    JOIN customers c ON c.id = d.customer_id
    JOIN cities cc ON cc.id = c.city_id";

const DRIVER_SELECT: &str = "
    SELECT dr.id, dr.name, c.id AS city_id, c.name AS city_name
    FROM drivers dr
    JOIN cities c ON c.id = dr.city_id";

const CUSTOMER_SELECT: &str = "
    SELECT p.id, p.name, p.description, c.id AS city_id, c.name AS city_name
    FROM customers p
    JOIN cities c ON c.id = p.city_id";

const RESTAURANT_SELECT: &str = "
    SELECT p.id, p.name, p.description, c.id AS city_id, c.name AS city_name
    FROM restaurants p
    JOIN cities c ON c.id = p.city_id";

const RANKING_SELECT: &str = "
    SELECT dr.id, dr.name, c.id AS city_id, c.name AS city_name,
           SUM(d.distance) AS total_distance
    FROM deliveries d
    JOIN drivers dr ON dr.id = d.driver_id
    JOIN cities c ON c.id = dr.city_id";

const RANKING_GROUP: &str = "
    GROUP BY dr.id, dr.name, c.id, c.name
    ORDER BY total_distance DESC, dr.id";

#[derive(sqlx::FromRow)]
struct CityRow {
    id: i64,
    name: String,
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        City { id: row.id, name: row.name }
    }
}

#[derive(sqlx::FromRow)]
struct DriverRow {
    id: i64,
    name: String,
    city_id: i64,
    city_name: String,
}

impl From<DriverRow> for Driver {
    fn from(row: DriverRow) -> Self {
        Driver {
            id: row.id,
            name: row.name,
            city: City { id: row.city_id, name: row.city_name },
        }
    }
}

/// Customers and restaurants share a column layout.
#[derive(sqlx::FromRow)]
struct PlaceRow {
    id: i64,
    name: String,
    description: String,
    city_id: i64,
    city_name: String,
}

impl From<PlaceRow> for Customer {
    fn from(row: PlaceRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            city: City { id: row.city_id, name: row.city_name },
            description: row.description,
        }
    }
}

impl From<PlaceRow> for Restaurant {
    fn from(row: PlaceRow) -> Self {
        Restaurant {
            id: row.id,
            name: row.name,
            city: City { id: row.city_id, name: row.city_name },
            description: row.description,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DeliveryRow {
    id: i64,
    delivery_time: DateTime<Utc>,
    distance: f64,
    driver_id: i64,
    driver_name: String,
    driver_city_id: i64,
    driver_city_name: String,
    restaurant_id: i64,
    restaurant_name: String,
    restaurant_description: String,
    restaurant_city_id: i64,
    restaurant_city_name: String,
    customer_id: i64,
    customer_name: String,
    customer_description: String,
    customer_city_id: i64,
    customer_city_name: String,
}

impl From<DeliveryRow> for Delivery {
    fn from(row: DeliveryRow) -> Self {
        Delivery {
            id: row.id,
            driver: Driver {
                id: row.driver_id,
                name: row.driver_name,
                city: City { id: row.driver_city_id, name: row.driver_city_name },
            },
            restaurant: Restaurant {
                id: row.restaurant_id,
                name: row.restaurant_name,
                city: City { id: row.restaurant_city_id, name: row.restaurant_city_name },
                description: row.restaurant_description,
            },
            customer: Customer {
                id: row.customer_id,
                name: row.customer_name,
                city: City { id: row.customer_city_id, name: row.customer_city_name },
                description: row.customer_description,
            },
            delivery_time: row.delivery_time,
            distance: row.distance,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RankingRow {
    id: i64,
    name: String,
    city_id: i64,
    city_name: String,
    total_distance: f64,
}

impl From<RankingRow> for DriverDistance {
    fn from(row: RankingRow) -> Self {
        DriverDistance {
            driver: Driver {
                id: row.id,
                name: row.name,
                city: City { id: row.city_id, name: row.city_name },
            },
            total_distance: row.total_distance,
        }
    }
}

/// Unique and foreign-key violations are constraint errors, everything else stays a
/// database error.
fn write_error(err: sqlx::Error) -> StoreError {
    if let Some(db) = err.as_database_error() {
        if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation() {
            return StoreError::Constraint(db.message().to_string());
        }
    }
    StoreError::Database(err)
}

fn delivery_count(count: i64) -> StoreResult<usize> {
    usize::try_from(count)
        .map_err(|_| StoreError::Constraint(format!("invalid delivery count: {}", count)))
}

#[async_trait]
impl Store for PgStore {
    async fn save_city(&self, mut city: City) -> StoreResult<City> {
        let id: i64 = sqlx::query_scalar("INSERT INTO cities (name) VALUES ($1) RETURNING id")
            .bind(&city.name)
            .fetch_one(&self.pool)
            .await
            .map_err(write_error)?;
        city.id = id;
        Ok(city)
    }

    async fn save_customer(&self, mut customer: Customer) -> StoreResult<Customer> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO customers (name, city_id, description) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&customer.name)
        .bind(customer.city.id)
        .bind(&customer.description)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;
        customer.id = id;
        Ok(customer)
    }

    async fn save_restaurant(&self, mut restaurant: Restaurant) -> StoreResult<Restaurant> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO restaurants (name, city_id, description) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&restaurant.name)
        .bind(restaurant.city.id)
        .bind(&restaurant.description)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;
        restaurant.id = id;
        Ok(restaurant)
    }

    async fn save_driver(&self, mut driver: Driver) -> StoreResult<Driver> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO drivers (name, city_id) VALUES ($1, $2) RETURNING id")
                .bind(&driver.name)
                .bind(driver.city.id)
                .fetch_one(&self.pool)
                .await
                .map_err(write_error)?;
        driver.id = id;
        Ok(driver)
    }

    async fn list_cities(&self) -> StoreResult<Vec<City>> {
        let rows = sqlx::query_as::<_, CityRow>("SELECT id, name FROM cities ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_city(&self, id: CityId) -> StoreResult<Option<City>> {
        let row = sqlx::query_as::<_, CityRow>("SELECT id, name FROM cities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_city_by_name(&self, name: &str) -> StoreResult<Option<City>> {
        let row = sqlx::query_as::<_, CityRow>("SELECT id, name FROM cities WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        let sql = format!("{CUSTOMER_SELECT} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_customer_by_name(&self, name: &str) -> StoreResult<Option<Customer>> {
        let sql = format!("{CUSTOMER_SELECT} WHERE p.name = $1 ORDER BY p.id LIMIT 1");
        let row = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_restaurant(&self, id: RestaurantId) -> StoreResult<Option<Restaurant>> {
        let sql = format!("{RESTAURANT_SELECT} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_restaurant_by_name(&self, name: &str) -> StoreResult<Option<Restaurant>> {
        let sql = format!("{RESTAURANT_SELECT} WHERE p.name = $1 ORDER BY p.id LIMIT 1");
        let row = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_driver_by_name(&self, name: &str) -> StoreResult<Option<Driver>> {
        let sql = format!("{DRIVER_SELECT} WHERE dr.name = $1 ORDER BY dr.id LIMIT 1");
        let row = sqlx::query_as::<_, DriverRow>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_drivers_by_city(&self, city_id: CityId) -> StoreResult<Vec<Driver>> {
        let sql = format!("{DRIVER_SELECT} WHERE dr.city_id = $1 ORDER BY dr.id");
        let rows = sqlx::query_as::<_, DriverRow>(&sql)
            .bind(city_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_driver_deliveries(&self, driver_id: DriverId) -> StoreResult<Vec<Delivery>> {
        let sql = format!("{DELIVERY_SELECT} WHERE d.driver_id = $1 ORDER BY d.id");
        let rows = sqlx::query_as::<_, DeliveryRow>(&sql)
            .bind(driver_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_driver_deliveries(&self, driver_id: DriverId) -> StoreResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM deliveries WHERE driver_id = $1")
            .bind(driver_id)
            .fetch_one(&self.pool)
            .await?;
        delivery_count(count)
    }

    async fn save_delivery(&self, delivery: NewDelivery) -> StoreResult<Delivery> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO deliveries (driver_id, restaurant_id, customer_id, delivery_time, distance)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(delivery.driver.id)
        .bind(delivery.restaurant.id)
        .bind(delivery.customer.id)
        .bind(delivery.delivery_time)
        .bind(delivery.distance)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;
        Ok(delivery.into_persisted(id))
    }

    async fn aggregate_distance_by_driver(&self) -> StoreResult<Vec<DriverDistance>> {
        let sql = format!("{RANKING_SELECT} {RANKING_GROUP}");
        let rows = sqlx::query_as::<_, RankingRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn aggregate_distance_by_driver_in_city(
        &self,
        city_id: CityId,
    ) -> StoreResult<Vec<DriverDistance>> {
        let sql = format!("{RANKING_SELECT} WHERE dr.city_id = $1 {RANKING_GROUP}");
        let rows = sqlx::query_as::<_, RankingRow>(&sql)
            .bind(city_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
