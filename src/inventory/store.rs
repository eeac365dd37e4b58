//! Inventory Store
//!
//! Item rows with two specialized atomic mutators. Purchase runs a
//! conditional decrement so the store itself enforces the non-negative
//! quantity invariant; a read-then-write in application code would race.
//! Every mutator holds one transaction for its whole read/write sequence.

use crate::db::SharedConnection;
use crate::inventory::models::{NewSweet, SearchFilter, Sweet, SweetPatch};
use chrono::Utc;
use rusqlite::{params, params_from_iter, OptionalExtension, ToSql, Transaction};

const SWEET_COLUMNS: &str = "id, name, category, price, quantity, created_at, updated_at";

#[derive(Debug)]
pub enum StoreError {
    DuplicateName,
    Database(rusqlite::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::DuplicateName => write!(f, "sweet name already exists"),
            StoreError::Database(e) => write!(f, "database error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::DuplicateName
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Outcome of a conditional-decrement purchase. Zero rows affected is
/// ambiguous, so the store disambiguates inside the same transaction and
/// reports a definite outcome.
#[derive(Debug)]
pub enum PurchaseOutcome {
    Purchased(Sweet),
    NotFound,
    InsufficientStock,
}

#[derive(Clone)]
pub struct SweetStore {
    conn: SharedConnection,
}

impl SweetStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub fn create(&self, new: &NewSweet) -> Result<Sweet, StoreError> {
        let now = Utc::now().to_rfc3339();

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO sweets (name, category, price, quantity, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![new.name, new.category, new.price, new.quantity, now],
        )?;

        Ok(Sweet {
            id: conn.last_insert_rowid(),
            name: new.name.clone(),
            category: new.category.clone(),
            price: new.price,
            quantity: new.quantity,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn get(&self, id: i64) -> Result<Option<Sweet>, StoreError> {
        let conn = self.conn.lock();
        let sweet = conn
            .query_row(
                &format!("SELECT {SWEET_COLUMNS} FROM sweets WHERE id = ?1"),
                params![id],
                Self::row_to_sweet,
            )
            .optional()?;
        Ok(sweet)
    }

    pub fn list(&self) -> Result<Vec<Sweet>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("SELECT {SWEET_COLUMNS} FROM sweets ORDER BY id"))?;
        let sweets = stmt
            .query_map([], Self::row_to_sweet)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sweets)
    }

    /// Case-insensitive substring match on name/category plus an inclusive
    /// price range; all present filters are ANDed.
    pub fn search(&self, filter: &SearchFilter) -> Result<Vec<Sweet>, StoreError> {
        let name_pattern = filter.name.as_ref().map(|n| format!("%{}%", n.to_lowercase()));
        let category_pattern = filter
            .category
            .as_ref()
            .map(|c| format!("%{}%", c.to_lowercase()));

        let mut clauses: Vec<&'static str> = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();

        if let Some(p) = name_pattern.as_ref() {
            clauses.push("LOWER(name) LIKE ?");
            values.push(p);
        }
        if let Some(p) = category_pattern.as_ref() {
            clauses.push("LOWER(category) LIKE ?");
            values.push(p);
        }
        if let Some(min) = filter.min_price.as_ref() {
            clauses.push("price >= ?");
            values.push(min);
        }
        if let Some(max) = filter.max_price.as_ref() {
            clauses.push("price <= ?");
            values.push(max);
        }

        let sql = if clauses.is_empty() {
            format!("SELECT {SWEET_COLUMNS} FROM sweets ORDER BY id")
        } else {
            format!(
                "SELECT {SWEET_COLUMNS} FROM sweets WHERE {} ORDER BY id",
                clauses.join(" AND ")
            )
        };

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let sweets = stmt
            .query_map(params_from_iter(values), Self::row_to_sweet)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sweets)
    }

    /// Partial update; returns `None` when the id does not exist.
    /// Plain edits are last-write-wins.
    pub fn update(&self, id: i64, patch: &SweetPatch) -> Result<Option<Sweet>, StoreError> {
        let now = Utc::now().to_rfc3339();

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        if Self::get_in_tx(&tx, id)?.is_none() {
            return Ok(None);
        }

        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();

        if let Some(name) = patch.name.as_ref() {
            sets.push("name = ?");
            values.push(name);
        }
        if let Some(category) = patch.category.as_ref() {
            sets.push("category = ?");
            values.push(category);
        }
        if let Some(price) = patch.price.as_ref() {
            sets.push("price = ?");
            values.push(price);
        }
        if let Some(quantity) = patch.quantity.as_ref() {
            sets.push("quantity = ?");
            values.push(quantity);
        }
        sets.push("updated_at = ?");
        values.push(&now);
        values.push(&id);

        let sql = format!("UPDATE sweets SET {} WHERE id = ?", sets.join(", "));
        tx.execute(&sql, params_from_iter(values))?;

        let sweet = Self::get_in_tx(&tx, id)?;
        tx.commit()?;
        Ok(sweet)
    }

    /// Returns `false` when the id does not exist.
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let affected = conn.execute("DELETE FROM sweets WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Atomic conditional decrement. The decrement, the disambiguation
    /// check, and the final read all run under one transaction, committed
    /// only on a determined outcome.
    pub fn purchase(&self, id: i64, qty: i64) -> Result<PurchaseOutcome, StoreError> {
        debug_assert!(qty > 0);
        let now = Utc::now().to_rfc3339();

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let affected = tx.execute(
            "UPDATE sweets SET quantity = quantity - ?1, updated_at = ?2
             WHERE id = ?3 AND quantity >= ?1",
            params![qty, now, id],
        )?;

        let outcome = if affected == 0 {
            // Zero rows: either the item is missing or stock is short.
            match Self::get_in_tx(&tx, id)? {
                Some(_) => PurchaseOutcome::InsufficientStock,
                None => PurchaseOutcome::NotFound,
            }
        } else {
            let sweet = Self::get_in_tx(&tx, id)?
                .ok_or(StoreError::Database(rusqlite::Error::QueryReturnedNoRows))?;
            PurchaseOutcome::Purchased(sweet)
        };

        tx.commit()?;
        Ok(outcome)
    }

    /// Atomic increment; returns `None` when the id does not exist. The
    /// single-statement add means concurrent restocks lose no additions.
    pub fn restock(&self, id: i64, qty: i64) -> Result<Option<Sweet>, StoreError> {
        debug_assert!(qty > 0);
        let now = Utc::now().to_rfc3339();

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let affected = tx.execute(
            "UPDATE sweets SET quantity = quantity + ?1, updated_at = ?2 WHERE id = ?3",
            params![qty, now, id],
        )?;
        if affected == 0 {
            return Ok(None);
        }

        let sweet = Self::get_in_tx(&tx, id)?
            .ok_or(StoreError::Database(rusqlite::Error::QueryReturnedNoRows))?;
        tx.commit()?;
        Ok(Some(sweet))
    }

    fn get_in_tx(tx: &Transaction<'_>, id: i64) -> Result<Option<Sweet>, StoreError> {
        let sweet = tx
            .query_row(
                &format!("SELECT {SWEET_COLUMNS} FROM sweets WHERE id = ?1"),
                params![id],
                Self::row_to_sweet,
            )
            .optional()?;
        Ok(sweet)
    }

    fn row_to_sweet(row: &rusqlite::Row) -> rusqlite::Result<Sweet> {
        Ok(Sweet {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            price: row.get(3)?,
            quantity: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}
