//! Appointments repository: durable record of bookings plus the
//! change-notification stream consumed by the availability views

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, Pool, Postgres};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::appointment::{
        AppointmentRecord, AppointmentStatus, NewAppointment, ServiceList,
        UpdateAppointmentFields,
    },
};

/// Raw row as stored; `status` and `service_type` are normalized on the way
/// out so nothing downstream sees the stored shapes
#[derive(Debug, FromRow)]
struct AppointmentRow {
    id: Uuid,
    appointment_date: NaiveDate,
    appointment_time: NaiveTime,
    status: String,
    full_name: String,
    phone: String,
    email: Option<String>,
    vehicle_make: String,
    vehicle_model: String,
    car_number: String,
    service_type: Json<ServiceList>,
    region: String,
    branch: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AppointmentRow> for AppointmentRecord {
    fn from(row: AppointmentRow) -> Self {
        Self {
            id: row.id,
            appointment_date: row.appointment_date,
            appointment_time: row.appointment_time,
            status: AppointmentStatus::from_db(&row.status),
            full_name: row.full_name,
            phone: row.phone,
            email: row.email,
            vehicle_make: row.vehicle_make,
            vehicle_model: row.vehicle_model,
            car_number: row.car_number,
            service_type: row.service_type.0.into_vec(),
            region: row.region,
            branch: row.branch,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Optional list filters (admin table)
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
    /// Free-text match over customer, vehicle, service and branch fields
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct AppointmentsRepository {
    pool: Pool<Postgres>,
    changes: broadcast::Sender<()>,
}

impl AppointmentsRepository {
    pub fn new(pool: Pool<Postgres>, changes: broadcast::Sender<()>) -> Self {
        Self { pool, changes }
    }

    /// Subscribe to the invalidation stream. The signal carries no payload;
    /// the full record set is expected to be re-fetched on every event.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }

    fn notify_changed(&self) {
        // No subscribers is fine
        let _ = self.changes.send(());
    }

    /// List appointments ordered by date then time, optionally filtered
    pub async fn list(&self, filter: &AppointmentFilter) -> AppResult<Vec<AppointmentRecord>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if filter.status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }
        if filter.date.is_some() {
            conditions.push(format!("appointment_date = ${}", idx));
            idx += 1;
        }
        if filter.search.is_some() {
            conditions.push(format!(
                "(full_name ILIKE ${i} OR phone ILIKE ${i} OR email ILIKE ${i} \
                 OR vehicle_make ILIKE ${i} OR vehicle_model ILIKE ${i} \
                 OR car_number ILIKE ${i} OR service_type::text ILIKE ${i} \
                 OR region ILIKE ${i} OR branch ILIKE ${i})",
                i = idx
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT * FROM appointments {} ORDER BY appointment_date ASC, appointment_time ASC",
            where_clause
        );

        let mut builder = sqlx::query_as::<_, AppointmentRow>(&query);
        if let Some(status) = filter.status {
            builder = builder.bind(status.as_str());
        }
        if let Some(date) = filter.date {
            builder = builder.bind(date);
        }
        if let Some(ref search) = filter.search {
            builder = builder.bind(format!("%{}%", search));
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(AppointmentRecord::from).collect())
    }

    /// Get an appointment by ID
    pub async fn get(&self, id: Uuid) -> AppResult<AppointmentRecord> {
        sqlx::query_as::<_, AppointmentRow>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(AppointmentRecord::from)
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    /// Create an appointment; status starts as pending
    pub async fn create(&self, data: &NewAppointment) -> AppResult<AppointmentRecord> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            INSERT INTO appointments (
                appointment_date, appointment_time, status,
                full_name, phone, email,
                vehicle_make, vehicle_model, car_number,
                service_type, region, branch
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(data.appointment_date)
        .bind(data.appointment_time)
        .bind(AppointmentStatus::Pending.as_str())
        .bind(&data.full_name)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.vehicle_make)
        .bind(&data.vehicle_model)
        .bind(&data.car_number)
        .bind(Json(ServiceList::from(data.service_type.clone())))
        .bind(&data.region)
        .bind(&data.branch)
        .fetch_one(&self.pool)
        .await?;

        self.notify_changed();
        Ok(AppointmentRecord::from(row))
    }

    /// Update only the status, stamping updated_at
    pub async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<AppointmentRecord> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            "UPDATE appointments SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;

        self.notify_changed();
        Ok(AppointmentRecord::from(row))
    }

    /// Partial field edit. Unset fields keep their stored values; concurrent
    /// edits to the same record are last-write-wins.
    pub async fn update_fields(
        &self,
        id: Uuid,
        data: &UpdateAppointmentFields,
    ) -> AppResult<AppointmentRecord> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            UPDATE appointments SET
                appointment_date = COALESCE($2, appointment_date),
                appointment_time = COALESCE($3, appointment_time),
                full_name = COALESCE($4, full_name),
                phone = COALESCE($5, phone),
                email = COALESCE($6, email),
                vehicle_make = COALESCE($7, vehicle_make),
                vehicle_model = COALESCE($8, vehicle_model),
                car_number = COALESCE($9, car_number),
                service_type = COALESCE($10, service_type),
                region = COALESCE($11, region),
                branch = COALESCE($12, branch),
                updated_at = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.appointment_date)
        .bind(data.appointment_time)
        .bind(&data.full_name)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.vehicle_make)
        .bind(&data.vehicle_model)
        .bind(&data.car_number)
        .bind(data.service_type.clone().map(|v| Json(ServiceList::from(v))))
        .bind(&data.region)
        .bind(&data.branch)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;

        self.notify_changed();
        Ok(AppointmentRecord::from(row))
    }

    /// Hard delete, no soft-delete or audit trail
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Appointment {} not found", id)));
        }
        self.notify_changed();
        Ok(())
    }
}
