// ABOUTME: Storage operations for loyalty cards
// ABOUTME: Every query is scoped to the owning user

use catima_core::{Balance, LoyaltyCard};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqliteExecutor, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::StorageError;

const CARD_COLUMNS: &str = "uuid, store, note, expiracy, balance_cents, balance_currency, card_id, \
     barcode_id_raw, barcode_type, header_color_raw, star_status, archive_status, last_used, \
     zoom_level, revision_id";

pub struct CardStorage {
    pool: SqlitePool,
}

impl CardStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Map every card of `owner_id` to its revision ID
    pub async fn list_revisions(&self, owner_id: i64) -> Result<Vec<(Uuid, u32)>, StorageError> {
        debug!("Listing card revisions for user {}", owner_id);

        let rows = sqlx::query(
            "SELECT uuid, revision_id FROM loyalty_cards WHERE owner_id = ? ORDER BY uuid",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let uuid = parse_uuid(row.try_get("uuid")?)?;
                let revision_id: u32 = row.try_get("revision_id")?;
                Ok::<_, StorageError>((uuid, revision_id))
            })
            .collect()
    }

    pub async fn list_cards(&self, owner_id: i64) -> Result<Vec<LoyaltyCard>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {CARD_COLUMNS} FROM loyalty_cards WHERE owner_id = ? ORDER BY store, uuid"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_card).collect()
    }

    /// Get a card owned by `owner_id`. Another owner's card is reported as
    /// absent.
    pub async fn get_card(
        &self,
        owner_id: i64,
        uuid: Uuid,
    ) -> Result<Option<LoyaltyCard>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {CARD_COLUMNS} FROM loyalty_cards WHERE owner_id = ? AND uuid = ?"
        ))
        .bind(owner_id)
        .bind(uuid.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_card).transpose()
    }

    pub async fn insert_card(&self, owner_id: i64, card: &LoyaltyCard) -> Result<(), StorageError> {
        insert_row(&self.pool, owner_id, card).await?;

        debug!("Inserted card {} for user {}", card.uuid, owner_id);
        Ok(())
    }

    /// Insert a batch of cards in one transaction; nothing is kept if
    /// any card fails
    pub async fn insert_cards(
        &self,
        owner_id: i64,
        cards: &[LoyaltyCard],
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        for card in cards {
            insert_row(&mut *tx, owner_id, card).await?;
        }
        tx.commit().await?;

        debug!("Inserted {} cards for user {}", cards.len(), owner_id);
        Ok(())
    }

    /// Delete a card; returns whether a card was removed
    pub async fn delete_card(&self, owner_id: i64, uuid: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM loyalty_cards WHERE owner_id = ? AND uuid = ?")
            .bind(owner_id)
            .bind(uuid.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn insert_row<'e, E>(executor: E, owner_id: i64, card: &LoyaltyCard) -> Result<(), StorageError>
where
    E: SqliteExecutor<'e>,
{
    card.validate()
        .map_err(|e| StorageError::InvalidData(format!("card {}: {e}", card.uuid)))?;

    sqlx::query(&format!(
        "INSERT INTO loyalty_cards (owner_id, {CARD_COLUMNS})
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(owner_id)
    .bind(card.uuid.to_string())
    .bind(&card.store)
    .bind(&card.note)
    .bind(card.expiracy)
    .bind(card.balance.cents())
    .bind(&card.balance_currency)
    .bind(&card.card_id)
    .bind(card.barcode_id_raw.as_deref())
    .bind(card.barcode_type.code())
    .bind(card.header_color_raw)
    .bind(card.star_status)
    .bind(card.archive_status)
    .bind(card.last_used)
    .bind(card.zoom_level)
    .bind(card.revision_id)
    .execute(executor)
    .await
    .map_err(|e| StorageError::from_insert(e, format!("card {}", card.uuid)))?;

    Ok(())
}

fn parse_uuid(value: String) -> Result<Uuid, StorageError> {
    Uuid::parse_str(&value).map_err(|e| StorageError::InvalidData(format!("uuid {value:?}: {e}")))
}

fn row_to_card(row: &SqliteRow) -> Result<LoyaltyCard, StorageError> {
    let barcode_type: String = row.try_get("barcode_type")?;
    let cents: i64 = row.try_get("balance_cents")?;

    let card = LoyaltyCard {
        uuid: parse_uuid(row.try_get("uuid")?)?,
        store: row.try_get("store")?,
        note: row.try_get("note")?,
        expiracy: row.try_get::<NaiveDate, _>("expiracy")?,
        balance: Balance::from_cents(cents).map_err(|e| StorageError::InvalidData(e.to_string()))?,
        balance_currency: row.try_get("balance_currency")?,
        card_id: row.try_get("card_id")?,
        barcode_id_raw: row.try_get("barcode_id_raw")?,
        barcode_type: barcode_type
            .parse()
            .map_err(|e: catima_core::CardError| StorageError::InvalidData(e.to_string()))?,
        header_color_raw: row.try_get("header_color_raw")?,
        star_status: row.try_get("star_status")?,
        archive_status: row.try_get("archive_status")?,
        last_used: row.try_get::<DateTime<Utc>, _>("last_used")?,
        zoom_level: row.try_get("zoom_level")?,
        revision_id: row.try_get("revision_id")?,
    };

    card.validate()
        .map_err(|e| StorageError::InvalidData(e.to_string()))?;
    Ok(card)
}
