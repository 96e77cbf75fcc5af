use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{params, Connection};
use std::path::Path;

use super::cart::CartStore;
use crate::assistant::catalog::{Product, ResolvedProduct};

/// Корзина, сохраняемая в SQLite между запусками
pub struct SqliteCart {
    conn: Connection,
    items: Vec<ResolvedProduct>,
}

impl SqliteCart {
    /// Создает или открывает базу данных корзины
    pub fn open(db_path: &Path) -> Result<Self> {
        // Создаем директорию если её нет
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("не удалось создать {}", parent.display()))?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("не удалось открыть {}", db_path.display()))?;
        log::info!("📦 SQLite БД корзины открыта: {}", db_path.display());

        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("не удалось открыть SQLite в памяти")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        Self::init_schema(&conn)?;
        let items = Self::load_items(&conn)?;
        log::info!("📖 Загружено {} товаров из корзины", items.len());
        Ok(Self { conn, items })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS cart_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id TEXT NOT NULL UNIQUE,
                category TEXT NOT NULL,
                product_json TEXT NOT NULL,
                added_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn load_items(conn: &Connection) -> Result<Vec<ResolvedProduct>> {
        let mut stmt = conn.prepare(
            "SELECT category, product_json FROM cart_items ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (category, json) = row?;
            match serde_json::from_str::<Product>(&json) {
                Ok(product) => items.push(ResolvedProduct { product, category }),
                Err(e) => log::warn!("⚠️ Пропущена поврежденная запись корзины: {}", e),
            }
        }
        Ok(items)
    }
}

impl CartStore for SqliteCart {
    fn add(&mut self, product: ResolvedProduct) -> Result<()> {
        if self.contains(product.id()) {
            return Ok(());
        }

        let json = serde_json::to_string(&product.product)?;
        self.conn
            .execute(
                "INSERT OR IGNORE INTO cart_items (product_id, category, product_json, added_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![product.id(), &product.category, &json, Local::now().to_rfc3339()],
            )
            .with_context(|| format!("не удалось сохранить {} в корзину", product.id()))?;

        log::info!("🛒 В корзину: {} ({})", product.product.name, product.id());
        self.items.push(product);
        Ok(())
    }

    fn items(&self) -> &[ResolvedProduct] {
        &self.items
    }
}
