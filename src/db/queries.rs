use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::models::{Appointment, Customer};

const DT_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";

// ── Customer master ──

/// Mints the next CUSTnnn id. The counter only moves forward, so an id is
/// never reissued even after its rows are deleted.
pub fn allocate_customer_id(conn: &Connection) -> anyhow::Result<String> {
    let next: i64 = conn.query_row(
        "UPDATE customer_id_seq SET next = next + 1 WHERE id = 1 RETURNING next - 1",
        [],
        |row| row.get(0),
    )?;
    Ok(format!("CUST{next:03}"))
}

pub fn upsert_customer(conn: &Connection, customer: &Customer) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO customers (customer_id, name, phone, created_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(customer_id) DO UPDATE SET
           name = excluded.name,
           phone = excluded.phone",
        params![
            customer.customer_id,
            customer.name,
            customer.phone,
            customer.created_at.format(DT_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_customer(conn: &Connection, customer_id: &str) -> anyhow::Result<Option<Customer>> {
    let mut stmt = conn.prepare(
        "SELECT customer_id, name, phone, created_at FROM customers
         WHERE customer_id = ?1 COLLATE NOCASE",
    )?;

    let result = stmt.query_row(params![customer_id], |row| {
        Ok(Customer {
            customer_id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            created_at: parse_dt(row.get::<_, String>(3)?),
        })
    });

    match result {
        Ok(customer) => Ok(Some(customer)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn all_customers(conn: &Connection) -> anyhow::Result<Vec<Customer>> {
    let mut stmt = conn.prepare(
        "SELECT customer_id, name, phone, created_at FROM customers ORDER BY customer_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Customer {
            customer_id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            created_at: parse_dt(row.get::<_, String>(3)?),
        })
    })?;
    let mut customers = vec![];
    for row in rows {
        customers.push(row?);
    }
    Ok(customers)
}

// ── Appointment log ──

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO appointments
           (id, customer_id, name, phone, date, time, reason, calendar_event_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            appt.id,
            appt.customer_id,
            appt.name,
            appt.phone,
            appt.date.map(|d| d.format(DATE_FMT).to_string()),
            appt.time.map(|t| t.format(TIME_FMT).to_string()),
            appt.reason,
            appt.calendar_event_id,
            appt.created_at.format(DT_FMT).to_string(),
            appt.updated_at.format(DT_FMT).to_string(),
        ],
    )?;
    Ok(())
}

const SELECT_APPT: &str =
    "SELECT id, customer_id, name, phone, date, time, reason, calendar_event_id, created_at, updated_at
     FROM appointments";

fn parse_appointment(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        date: row
            .get::<_, Option<String>>(4)?
            .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FMT).ok()),
        time: row
            .get::<_, Option<String>>(5)?
            .and_then(|s| NaiveTime::parse_from_str(&s, TIME_FMT).ok()),
        reason: row.get(6)?,
        calendar_event_id: row.get(7)?,
        created_at: parse_dt(row.get::<_, String>(8)?),
        updated_at: parse_dt(row.get::<_, String>(9)?),
    })
}

/// Locate an appointment the way a reschedule identifies it: who it is for
/// and when it currently is.
pub fn find_by_identity(
    conn: &Connection,
    name: &str,
    phone: &str,
    date: NaiveDate,
    time: NaiveTime,
) -> anyhow::Result<Option<Appointment>> {
    let sql = format!(
        "{SELECT_APPT} WHERE name = ?1 COLLATE NOCASE AND phone = ?2 AND date = ?3 AND time = ?4
         ORDER BY created_at DESC LIMIT 1"
    );
    let mut stmt = conn.prepare(&sql)?;
    let result = stmt.query_row(
        params![
            name,
            phone,
            date.format(DATE_FMT).to_string(),
            time.format(TIME_FMT).to_string(),
        ],
        parse_appointment,
    );
    match result {
        Ok(appt) => Ok(Some(appt)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Locate an appointment the way a cancellation identifies it: by the
/// permanent customer id and the slot.
pub fn find_by_customer_slot(
    conn: &Connection,
    customer_id: &str,
    date: NaiveDate,
    time: NaiveTime,
) -> anyhow::Result<Option<Appointment>> {
    let sql = format!(
        "{SELECT_APPT} WHERE customer_id = ?1 COLLATE NOCASE AND date = ?2 AND time = ?3
         ORDER BY created_at DESC LIMIT 1"
    );
    let mut stmt = conn.prepare(&sql)?;
    let result = stmt.query_row(
        params![
            customer_id,
            date.format(DATE_FMT).to_string(),
            time.format(TIME_FMT).to_string(),
        ],
        parse_appointment,
    );
    match result {
        Ok(appt) => Ok(Some(appt)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn appointments_for_customer(
    conn: &Connection,
    customer_id: &str,
) -> anyhow::Result<Vec<Appointment>> {
    let sql = format!(
        "{SELECT_APPT} WHERE customer_id = ?1 COLLATE NOCASE ORDER BY date ASC, time ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![customer_id], parse_appointment)?;
    let mut appointments = vec![];
    for row in rows {
        appointments.push(row?);
    }
    Ok(appointments)
}

pub fn all_appointments(conn: &Connection) -> anyhow::Result<Vec<Appointment>> {
    let sql = format!("{SELECT_APPT} ORDER BY date ASC, time ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], parse_appointment)?;
    let mut appointments = vec![];
    for row in rows {
        appointments.push(row?);
    }
    Ok(appointments)
}

/// Reschedule: moves the slot on the SAME row, never a new one.
pub fn update_appointment_slot(
    conn: &Connection,
    row_id: &str,
    new_date: NaiveDate,
    new_time: NaiveTime,
    calendar_event_id: &str,
) -> anyhow::Result<()> {
    let now = Utc::now().naive_utc().format(DT_FMT).to_string();
    conn.execute(
        "UPDATE appointments SET date = ?2, time = ?3, calendar_event_id = ?4, updated_at = ?5
         WHERE id = ?1",
        params![
            row_id,
            new_date.format(DATE_FMT).to_string(),
            new_time.format(TIME_FMT).to_string(),
            calendar_event_id,
            now,
        ],
    )?;
    Ok(())
}

/// Cancellation policy: clear the slot, keep the row and the customer id.
pub fn clear_appointment_slot(conn: &Connection, row_id: &str) -> anyhow::Result<()> {
    let now = Utc::now().naive_utc().format(DT_FMT).to_string();
    conn.execute(
        "UPDATE appointments
         SET date = NULL, time = NULL, reason = NULL, calendar_event_id = NULL, updated_at = ?2
         WHERE id = ?1",
        params![row_id, now],
    )?;
    Ok(())
}

/// Hard delete, admin surface only.
pub fn delete_appointment(conn: &Connection, row_id: &str) -> anyhow::Result<bool> {
    let affected = conn.execute("DELETE FROM appointments WHERE id = ?1", params![row_id])?;
    Ok(affected > 0)
}

pub struct StoreStats {
    pub customer_count: i64,
    pub appointment_count: i64,
    pub upcoming_count: i64,
}

pub fn store_stats(conn: &Connection, today: NaiveDate) -> anyhow::Result<StoreStats> {
    let customer_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
    let appointment_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM appointments WHERE date IS NOT NULL",
        [],
        |row| row.get(0),
    )?;
    let upcoming_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM appointments WHERE date >= ?1",
        params![today.format(DATE_FMT).to_string()],
        |row| row.get(0),
    )?;
    Ok(StoreStats {
        customer_count,
        appointment_count,
        upcoming_count,
    })
}

fn parse_dt(s: String) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&s, DT_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}
