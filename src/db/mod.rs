// Database access layer (SQLite via sqlx).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::query::Query;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Row, TypeInfo, ValueRef};

/// The robot state table only ever holds this row.
pub const ROBOT_STATE_ID: i64 = 1;

/// The stored robot row. Values come back in whatever storage class SQLite
/// kept them, so a flag written as `true` reads back as `1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotState {
    pub id: i64,
    pub x: Value,
    pub y: Value,
    pub direction: Value,
    pub is_digging: Value,
    pub is_jumping: Value,
    pub timestamp: Value,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for RobotState {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            x: column_json(row, "x")?,
            y: column_json(row, "y")?,
            direction: column_json(row, "direction")?,
            is_digging: column_json(row, "is_digging")?,
            is_jumping: column_json(row, "is_jumping")?,
            timestamp: column_json(row, "timestamp")?,
        })
    }
}

/// Robot state as posted by the game client (camelCase flags).
///
/// Fields are untyped: column affinity decides what gets stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RobotStateUpdate {
    pub x: Option<Value>,
    pub y: Option<Value>,
    pub direction: Option<Value>,
    #[serde(rename = "isDigging")]
    pub is_digging: Option<Value>,
    #[serde(rename = "isJumping")]
    pub is_jumping: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryItem {
    pub id: i64,
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub item_type: Option<String>,
    pub prefix: Option<String>,
    pub color: Option<String>,
    pub symbol: Option<String>,
    pub rarity: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub timestamp: Option<String>,
}

/// An inventory item as posted. Every column is TEXT, so numbers and
/// booleans are stored in their text form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub name: Option<Value>,
    #[serde(rename = "type")]
    pub item_type: Option<Value>,
    pub prefix: Option<Value>,
    pub color: Option<Value>,
    pub symbol: Option<Value>,
    pub rarity: Option<Value>,
    pub description: Option<Value>,
    pub category: Option<Value>,
}

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Bind a JSON value as the matching SQLite scalar. Arrays and objects are
/// stored as their JSON text.
fn bind_json<'q>(query: SqliteQuery<'q>, value: &Option<Value>) -> SqliteQuery<'q> {
    match value {
        None | Some(Value::Null) => query.bind(None::<String>),
        Some(Value::Bool(b)) => query.bind(*b),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => query.bind(i),
            None => query.bind(n.as_f64()),
        },
        Some(Value::String(s)) => query.bind(s.clone()),
        Some(other) => query.bind(other.to_string()),
    }
}

/// Read a column as JSON according to its storage class.
fn column_json(row: &SqliteRow, column: &str) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(column)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage = raw.type_info().name().to_string();
    let value = match storage.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(column)?),
        "REAL" => Value::from(row.try_get::<f64, _>(column)?),
        "BLOB" => {
            let bytes: Vec<u8> = row.try_get(column)?;
            Value::from(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::from(row.try_get::<String, _>(column)?),
    };
    Ok(value)
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemTemplate {
    pub id: i64,
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub item_type: Option<String>,
    pub prefix: Option<String>,
    pub rarity: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItemTemplate {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub prefix: String,
    pub rarity: String,
    pub description: String,
    pub category: String,
}

/// Optional equality filters for random item selection. `None` matches anything.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub rarity: Option<String>,
}

/// Aggregate inventory counts. Every `by_*` map sums to `total`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryStats {
    pub total: i64,
    pub by_type: BTreeMap<String, i64>,
    pub by_prefix: BTreeMap<String, i64>,
    pub by_rarity: BTreeMap<String, i64>,
    pub by_category: BTreeMap<String, i64>,
}

/// Row counts reported by the server status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub robot_state_entries: i64,
    pub inventory_items: i64,
    pub item_templates: i64,
}

/// Inventory columns that can be grouped on for stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupColumn {
    Type,
    Prefix,
    Rarity,
    Category,
}

impl GroupColumn {
    fn as_sql(self) -> &'static str {
        match self {
            GroupColumn::Type => "type",
            GroupColumn::Prefix => "prefix",
            GroupColumn::Rarity => "rarity",
            GroupColumn::Category => "category",
        }
    }
}

const INVENTORY_COLUMNS: &str =
    "id, name, type, prefix, color, symbol, rarity, description, category, timestamp";
const TEMPLATE_COLUMNS: &str = "id, name, type, prefix, rarity, description, category";

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and create any missing tables.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let db = Self::open_existing(database_url).await?;
        db.run_migrations().await?;
        Ok(db)
    }

    async fn open_existing(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Open an existing database file for inspection. Never creates the file.
    pub async fn open_read_only(path: &Path) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS robot_state (
                id INTEGER PRIMARY KEY,
                x REAL,
                y REAL,
                direction INTEGER,
                is_digging BOOLEAN,
                is_jumping BOOLEAN,
                timestamp TEXT
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inventory_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                type TEXT,
                prefix TEXT,
                color TEXT,
                symbol TEXT,
                rarity TEXT,
                description TEXT,
                category TEXT,
                timestamp TEXT
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS item_templates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                type TEXT,
                prefix TEXT,
                rarity TEXT,
                description TEXT,
                category TEXT
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ── Robot state ───────────────────────────────────────────────────

    pub async fn upsert_robot_state(&self, state: &RobotStateUpdate) -> Result<(), sqlx::Error> {
        let query = sqlx::query(
            "INSERT OR REPLACE INTO robot_state (id, x, y, direction, is_digging, is_jumping, timestamp) VALUES (?, ?, ?, ?, ?, ?, datetime('now'))",
        )
        .bind(ROBOT_STATE_ID);
        let query = [
            &state.x,
            &state.y,
            &state.direction,
            &state.is_digging,
            &state.is_jumping,
        ]
        .into_iter()
        .fold(query, bind_json);
        query.execute(&self.pool).await?;
        Ok(())
    }

    pub async fn get_robot_state(&self) -> Result<Option<RobotState>, sqlx::Error> {
        let row = sqlx::query_as::<_, RobotState>(
            "SELECT id, x, y, direction, is_digging, is_jumping, timestamp FROM robot_state WHERE id = ?",
        )
        .bind(ROBOT_STATE_ID)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // ── Inventory ─────────────────────────────────────────────────────

    /// Append an item and return its id.
    pub async fn add_inventory_item(&self, item: &NewInventoryItem) -> Result<i64, sqlx::Error> {
        let query = sqlx::query(
            "INSERT INTO inventory_items (name, type, prefix, color, symbol, rarity, description, category, timestamp) VALUES (?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))",
        );
        let result = [
            &item.name,
            &item.item_type,
            &item.prefix,
            &item.color,
            &item.symbol,
            &item.rarity,
            &item.description,
            &item.category,
        ]
        .into_iter()
        .fold(query, bind_json)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Newest first. `None` returns every item.
    pub async fn list_inventory_items(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<InventoryItem>, sqlx::Error> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map(|l| l.max(0)).unwrap_or(-1);
        let rows = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory_items ORDER BY timestamp DESC, id DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn inventory_stats(&self) -> Result<InventoryStats, sqlx::Error> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(InventoryStats {
            total,
            by_type: self.group_counts(GroupColumn::Type).await?,
            by_prefix: self.group_counts(GroupColumn::Prefix).await?,
            by_rarity: self.group_counts(GroupColumn::Rarity).await?,
            by_category: self.group_counts(GroupColumn::Category).await?,
        })
    }

    async fn group_counts(&self, column: GroupColumn) -> Result<BTreeMap<String, i64>, sqlx::Error> {
        let col = column.as_sql();
        let rows: Vec<(Option<String>, i64)> = sqlx::query_as(&format!(
            "SELECT {col}, COUNT(*) FROM inventory_items GROUP BY {col}"
        ))
        .fetch_all(&self.pool)
        .await?;

        // NULL and the literal string "null" share a key, so accumulate.
        let mut counts = BTreeMap::new();
        for (key, count) in rows {
            *counts.entry(key.unwrap_or_else(|| "null".to_string())).or_insert(0) += count;
        }
        Ok(counts)
    }

    pub async fn random_inventory_item(
        &self,
        filter: &ItemFilter,
    ) -> Result<Option<InventoryItem>, sqlx::Error> {
        let row = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory_items WHERE (? IS NULL OR category = ?) AND (? IS NULL OR rarity = ?) ORDER BY RANDOM() LIMIT 1"
        ))
        .bind(&filter.category)
        .bind(&filter.category)
        .bind(&filter.rarity)
        .bind(&filter.rarity)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // ── Item templates ────────────────────────────────────────────────

    pub async fn list_item_templates(
        &self,
        limit: i64,
        category: Option<&str>,
    ) -> Result<Vec<ItemTemplate>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ItemTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM item_templates WHERE (? IS NULL OR category = ?) ORDER BY id LIMIT ?"
        ))
        .bind(category)
        .bind(category)
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn random_item_template(
        &self,
        filter: &ItemFilter,
    ) -> Result<Option<ItemTemplate>, sqlx::Error> {
        let row = sqlx::query_as::<_, ItemTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM item_templates WHERE (? IS NULL OR category = ?) AND (? IS NULL OR rarity = ?) ORDER BY RANDOM() LIMIT 1"
        ))
        .bind(&filter.category)
        .bind(&filter.category)
        .bind(&filter.rarity)
        .bind(&filter.rarity)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Clear the catalog and insert `templates` in one transaction.
    pub async fn replace_item_templates(
        &self,
        templates: &[NewItemTemplate],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM item_templates")
            .execute(&mut *tx)
            .await?;

        let mut inserted = 0;
        for t in templates {
            let result = sqlx::query(
                "INSERT INTO item_templates (name, type, prefix, rarity, description, category) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&t.name)
            .bind(&t.item_type)
            .bind(&t.prefix)
            .bind(&t.rarity)
            .bind(&t.description)
            .bind(&t.category)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    // ── Introspection ─────────────────────────────────────────────────

    pub async fn database_stats(&self) -> Result<DatabaseStats, sqlx::Error> {
        let robot_state_entries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM robot_state")
            .fetch_one(&self.pool)
            .await?;
        let inventory_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items")
            .fetch_one(&self.pool)
            .await?;
        let item_templates: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item_templates")
            .fetch_one(&self.pool)
            .await?;
        Ok(DatabaseStats {
            robot_state_entries,
            inventory_items,
            item_templates,
        })
    }

    /// Every user table with its row count, ordered by name.
    pub async fn table_row_counts(&self) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut counts = Vec::with_capacity(tables.len());
        for table in tables {
            let quoted = table.replace('"', "\"\"");
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{quoted}\""))
                .fetch_one(&self.pool)
                .await?;
            counts.push((table, count));
        }
        Ok(counts)
    }

    /// Distribution of a seeded column, largest group first.
    pub async fn inventory_distribution(
        &self,
        column: GroupColumn,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let mut rows: Vec<(String, i64)> = self.group_counts(column).await?.into_iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(rows)
    }

    pub async fn sample_inventory_items(&self, n: i64) -> Result<Vec<InventoryItem>, sqlx::Error> {
        let rows = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory_items ORDER BY RANDOM() LIMIT ?"
        ))
        .bind(n)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn test_db() -> Database {
        Database::new("sqlite::memory:").await.unwrap()
    }

    fn item(name: &str, item_type: &str, prefix: &str, rarity: &str, category: &str) -> NewInventoryItem {
        NewInventoryItem {
            name: Some(json!(name)),
            item_type: Some(json!(item_type)),
            prefix: Some(json!(prefix)),
            color: Some(json!("#aaaaaa")),
            symbol: Some(json!("*")),
            rarity: Some(json!(rarity)),
            description: None,
            category: Some(json!(category)),
        }
    }

    fn template(name: &str, rarity: &str, category: &str) -> NewItemTemplate {
        NewItemTemplate {
            name: name.into(),
            item_type: name.into(),
            prefix: "Rusty".into(),
            rarity: rarity.into(),
            description: "desc".into(),
            category: category.into(),
        }
    }

    #[tokio::test]
    async fn test_robot_state_upsert_keeps_single_row() {
        let db = test_db().await;
        assert!(db.get_robot_state().await.unwrap().is_none());

        db.upsert_robot_state(&RobotStateUpdate {
            x: Some(json!(1.5)),
            y: Some(json!(2.0)),
            direction: Some(json!(-1)),
            is_digging: Some(json!(true)),
            is_jumping: Some(json!(false)),
        })
        .await
        .unwrap();
        db.upsert_robot_state(&RobotStateUpdate {
            x: Some(json!(100)),
            y: Some(json!(200.25)),
            direction: Some(json!(1)),
            is_digging: Some(json!(false)),
            is_jumping: Some(json!(true)),
        })
        .await
        .unwrap();

        let state = db.get_robot_state().await.unwrap().unwrap();
        assert_eq!(state.id, ROBOT_STATE_ID);
        assert_eq!(state.x, json!(100.0));
        assert_eq!(state.y, json!(200.25));
        assert_eq!(state.direction, json!(1));
        assert_eq!(state.is_digging, json!(0));
        assert_eq!(state.is_jumping, json!(1));
        assert!(state.timestamp.is_string());

        let stats = db.database_stats().await.unwrap();
        assert_eq!(stats.robot_state_entries, 1);
    }

    #[tokio::test]
    async fn test_robot_state_missing_fields_are_null() {
        let db = test_db().await;
        db.upsert_robot_state(&RobotStateUpdate {
            x: Some(json!(3.0)),
            y: Some(Value::Null),
            ..Default::default()
        })
        .await
        .unwrap();

        let state = db.get_robot_state().await.unwrap().unwrap();
        assert_eq!(state.x, json!(3.0));
        assert_eq!(state.y, Value::Null);
        assert_eq!(state.is_digging, Value::Null);
    }

    #[tokio::test]
    async fn test_robot_state_values_follow_column_affinity() {
        let db = test_db().await;
        db.upsert_robot_state(&RobotStateUpdate {
            x: Some(json!("12.5")),
            y: Some(json!("ground")),
            direction: Some(json!("-1")),
            is_digging: Some(json!(1)),
            is_jumping: Some(json!("yes")),
        })
        .await
        .unwrap();

        let state = db.get_robot_state().await.unwrap().unwrap();
        // Numeric text converts; anything else is kept as TEXT.
        assert_eq!(state.x, json!(12.5));
        assert_eq!(state.y, json!("ground"));
        assert_eq!(state.direction, json!(-1));
        assert_eq!(state.is_digging, json!(1));
        assert_eq!(state.is_jumping, json!("yes"));
    }

    #[tokio::test]
    async fn test_inventory_fields_are_stored_as_text() {
        let db = test_db().await;
        let id = db
            .add_inventory_item(&NewInventoryItem {
                name: Some(json!(42)),
                item_type: Some(json!(true)),
                prefix: Some(json!(["a", "b"])),
                ..Default::default()
            })
            .await
            .unwrap();

        let items = db.list_inventory_items(None).await.unwrap();
        assert_eq!(items[0].id, id);
        assert_eq!(items[0].name.as_deref(), Some("42"));
        assert_eq!(items[0].item_type.as_deref(), Some("1"));
        assert_eq!(items[0].prefix.as_deref(), Some(r#"["a","b"]"#));
        assert_eq!(items[0].color, None);
    }

    #[tokio::test]
    async fn test_inventory_add_and_list_newest_first() {
        let db = test_db().await;
        let a = db.add_inventory_item(&item("Coal", "mineral", "Basic", "common", "mineral")).await.unwrap();
        let b = db.add_inventory_item(&item("Ruby", "gem", "Superior", "rare", "gem")).await.unwrap();
        let c = db.add_inventory_item(&item("Saw", "tool", "Basic", "common", "tool")).await.unwrap();
        assert!(a < b && b < c);

        let items = db.list_inventory_items(None).await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, c);
        assert_eq!(items[2].id, a);
        assert_eq!(items[1].item_type.as_deref(), Some("gem"));

        let limited = db.list_inventory_items(Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, c);
    }

    #[tokio::test]
    async fn test_inventory_stats_groups_sum_to_total() {
        let db = test_db().await;
        db.add_inventory_item(&item("Coal", "mineral", "Basic", "common", "mineral")).await.unwrap();
        db.add_inventory_item(&item("Iron Ore", "mineral", "Solid", "uncommon", "mineral")).await.unwrap();
        db.add_inventory_item(&item("Ruby", "gem", "Basic", "rare", "gem")).await.unwrap();
        db.add_inventory_item(&NewInventoryItem::default()).await.unwrap();

        let stats = db.inventory_stats().await.unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_type.get("mineral"), Some(&2));
        assert_eq!(stats.by_type.get("null"), Some(&1));
        assert_eq!(stats.by_prefix.get("Basic"), Some(&2));
        for group in [&stats.by_type, &stats.by_prefix, &stats.by_rarity, &stats.by_category] {
            assert_eq!(group.values().sum::<i64>(), stats.total);
        }
    }

    #[tokio::test]
    async fn test_random_inventory_item_respects_filters() {
        let db = test_db().await;
        assert!(db.random_inventory_item(&ItemFilter::default()).await.unwrap().is_none());

        db.add_inventory_item(&item("Coal", "mineral", "Basic", "common", "mineral")).await.unwrap();
        db.add_inventory_item(&item("Ruby", "gem", "Superior", "rare", "gem")).await.unwrap();

        for _ in 0..10 {
            let found = db
                .random_inventory_item(&ItemFilter {
                    category: Some("gem".into()),
                    rarity: None,
                })
                .await
                .unwrap()
                .unwrap();
            assert_eq!(found.name.as_deref(), Some("Ruby"));
        }

        let none = db
            .random_inventory_item(&ItemFilter {
                category: Some("gem".into()),
                rarity: Some("common".into()),
            })
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_replace_item_templates() {
        let db = test_db().await;
        let first = vec![template("A", "Rare", "alien"), template("B", "Common", "fantasy")];
        assert_eq!(db.replace_item_templates(&first).await.unwrap(), 2);

        let second = vec![template("C", "Epic", "alien")];
        assert_eq!(db.replace_item_templates(&second).await.unwrap(), 1);

        let all = db.list_item_templates(100, None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn test_list_and_random_templates() {
        let db = test_db().await;
        let batch: Vec<_> = (0..5)
            .map(|i| template(&format!("T{i}"), if i % 2 == 0 { "Rare" } else { "Common" }, "alien"))
            .chain(std::iter::once(template("F", "Rare", "fantasy")))
            .collect();
        db.replace_item_templates(&batch).await.unwrap();

        assert_eq!(db.list_item_templates(3, None).await.unwrap().len(), 3);
        assert_eq!(db.list_item_templates(100, Some("fantasy")).await.unwrap().len(), 1);
        assert!(db.list_item_templates(-5, None).await.unwrap().is_empty());

        let filter = ItemFilter {
            category: Some("alien".into()),
            rarity: Some("Rare".into()),
        };
        for _ in 0..10 {
            let t = db.random_item_template(&filter).await.unwrap().unwrap();
            assert_eq!(t.category.as_deref(), Some("alien"));
            assert_eq!(t.rarity.as_deref(), Some("Rare"));
        }

        let missing = ItemFilter {
            category: Some("mystical".into()),
            rarity: None,
        };
        assert!(db.random_item_template(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_table_row_counts() {
        let db = test_db().await;
        db.add_inventory_item(&NewInventoryItem::default()).await.unwrap();

        let counts = db.table_row_counts().await.unwrap();
        let names: Vec<&str> = counts.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["inventory_items", "item_templates", "robot_state"]);
        assert_eq!(counts[0].1, 1);
    }
}
