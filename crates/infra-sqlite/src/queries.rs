// Ticket SQL shared by the pool-backed store and transactions
//
// Every function is generic over the executor so the same statement runs
// against `&SqlitePool` or `&mut *tx`.

use crate::ticket_store::map_sqlx_error;
use sqlx::{Executor, FromRow, Sqlite};
use ticketline_core::domain::{
    Category, ContactInfo, CounterId, Ticket, TicketCode, TicketId, TicketStatus,
};
use ticketline_core::error::{AppError, Result};

const TICKET_COLUMNS: &str = "id, code, category, status, created_at, served_at, completed_at, \
     counter, contact_name, contact_phone, contact_location";

/// Raw `tickets` row
#[derive(Debug, FromRow)]
pub(crate) struct TicketRow {
    id: String,
    code: String,
    category: String,
    status: String,
    created_at: i64,
    served_at: Option<i64>,
    completed_at: Option<i64>,
    counter: Option<CounterId>,
    contact_name: Option<String>,
    contact_phone: Option<String>,
    contact_location: Option<String>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = AppError;

    fn try_from(row: TicketRow) -> Result<Self> {
        let category: Category = row.category.parse()?;
        let status: TicketStatus = row.status.parse()?;

        let contact = match (row.contact_name, row.contact_phone, row.contact_location) {
            (Some(name), Some(phone), Some(location)) => {
                Some(ContactInfo::new(name, phone, location))
            }
            _ => None,
        };

        Ok(Ticket {
            id: row.id,
            code: TicketCode::from_raw(row.code),
            category,
            status,
            created_at: row.created_at,
            served_at: row.served_at,
            completed_at: row.completed_at,
            contact,
            counter: row.counter,
        })
    }
}

fn into_tickets(rows: Vec<TicketRow>) -> Result<Vec<Ticket>> {
    rows.into_iter().map(Ticket::try_from).collect()
}

pub(crate) async fn insert<'e, E>(executor: E, ticket: &Ticket) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let contact = ticket.contact.as_ref();

    sqlx::query(
        r#"
        INSERT INTO tickets (
            id, code, category, status,
            created_at, served_at, completed_at, counter,
            contact_name, contact_phone, contact_location
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&ticket.id)
    .bind(ticket.code.as_str())
    .bind(ticket.category.as_str())
    .bind(ticket.status.as_str())
    .bind(ticket.created_at)
    .bind(ticket.served_at)
    .bind(ticket.completed_at)
    .bind(ticket.counter)
    .bind(contact.map(|c| c.name.as_str()))
    .bind(contact.map(|c| c.phone.as_str()))
    .bind(contact.map(|c| c.location.as_str()))
    .execute(executor)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

/// Persist the mutable fields; the rest of a ticket never changes
pub(crate) async fn update<'e, E>(executor: E, ticket: &Ticket) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE tickets
        SET status = ?, counter = ?, served_at = ?, completed_at = ?
        WHERE id = ?
        "#,
    )
    .bind(ticket.status.as_str())
    .bind(ticket.counter)
    .bind(ticket.served_at)
    .bind(ticket.completed_at)
    .bind(&ticket.id)
    .execute(executor)
    .await
    .map_err(map_sqlx_error)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Ticket {} not found", ticket.id)));
    }
    Ok(())
}

pub(crate) async fn find_by_id<'e, E>(executor: E, id: &TicketId) -> Result<Option<Ticket>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {} FROM tickets WHERE id = ?", TICKET_COLUMNS);
    let row: Option<TicketRow> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(map_sqlx_error)?;

    row.map(Ticket::try_from).transpose()
}

pub(crate) async fn latest_in_category<'e, E>(
    executor: E,
    category: Category,
) -> Result<Option<Ticket>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM tickets WHERE category = ? ORDER BY created_at DESC, rowid DESC LIMIT 1",
        TICKET_COLUMNS
    );
    let row: Option<TicketRow> = sqlx::query_as(&sql)
        .bind(category.as_str())
        .fetch_optional(executor)
        .await
        .map_err(map_sqlx_error)?;

    row.map(Ticket::try_from).transpose()
}

pub(crate) async fn oldest_waiting<'e, E>(executor: E) -> Result<Option<Ticket>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM tickets WHERE status = ? ORDER BY created_at ASC, rowid ASC LIMIT 1",
        TICKET_COLUMNS
    );
    let row: Option<TicketRow> = sqlx::query_as(&sql)
        .bind(TicketStatus::Waiting.as_str())
        .fetch_optional(executor)
        .await
        .map_err(map_sqlx_error)?;

    row.map(Ticket::try_from).transpose()
}

pub(crate) async fn find_by_status<'e, E>(executor: E, status: TicketStatus) -> Result<Vec<Ticket>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM tickets WHERE status = ? ORDER BY created_at ASC, rowid ASC",
        TICKET_COLUMNS
    );
    let rows: Vec<TicketRow> = sqlx::query_as(&sql)
        .bind(status.as_str())
        .fetch_all(executor)
        .await
        .map_err(map_sqlx_error)?;

    into_tickets(rows)
}

pub(crate) async fn list_all<'e, E>(executor: E) -> Result<Vec<Ticket>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM tickets ORDER BY created_at ASC, rowid ASC",
        TICKET_COLUMNS
    );
    let rows: Vec<TicketRow> = sqlx::query_as(&sql)
        .fetch_all(executor)
        .await
        .map_err(map_sqlx_error)?;

    into_tickets(rows)
}

pub(crate) async fn count_by_status<'e, E>(executor: E, status: TicketStatus) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE status = ?")
        .bind(status.as_str())
        .fetch_one(executor)
        .await
        .map_err(map_sqlx_error)
}

pub(crate) async fn count_outstanding_with_code<'e, E>(
    executor: E,
    category: Category,
    code: &str,
) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM tickets
        WHERE category = ? AND code = ? AND status IN (?, ?)
        "#,
    )
    .bind(category.as_str())
    .bind(code)
    .bind(TicketStatus::Waiting.as_str())
    .bind(TicketStatus::Serving.as_str())
    .fetch_one(executor)
    .await
    .map_err(map_sqlx_error)
}

pub(crate) async fn delete_all<'e, E>(executor: E) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM tickets")
        .execute(executor)
        .await
        .map_err(map_sqlx_error)?;

    Ok(result.rows_affected())
}
