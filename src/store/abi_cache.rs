//! Persistent cache for explorer-fetched contract ABIs

use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Cached contract ABI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAbi {
    pub chain_id: u64,
    pub address: String,
    pub abi_json: String,
    /// Explorer the ABI came from
    pub source: String,
}

/// SQLite-backed ABI cache
#[derive(Debug)]
pub struct AbiCache {
    conn: Mutex<Connection>,
}

impl AbiCache {
    /// Open or create the cache database, creating its directory if needed
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create cache dir {}", parent.display()))?;
        }
        let conn = Connection::open(path).with_context(|| format!("open db {}", path.display()))?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.init()?;
        Ok(cache)
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("abi cache lock poisoned"))
    }

    /// Initialize database schema
    fn init(&self) -> Result<()> {
        self.conn()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS abis (
                chain_id    INTEGER NOT NULL,
                address     TEXT NOT NULL,
                abi_json    TEXT NOT NULL,
                source      TEXT NOT NULL,
                created_at  INTEGER DEFAULT (strftime('%s', 'now')),
                PRIMARY KEY (chain_id, address)
            );
            ",
        )?;
        Ok(())
    }

    /// Save a contract ABI, replacing any previous entry for the same address
    pub fn save_abi(
        &self,
        chain_id: u64,
        address: &str,
        abi_json: &str,
        source: &str,
    ) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO abis(chain_id, address, abi_json, source) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(chain_id, address) DO UPDATE SET
                abi_json=excluded.abi_json,
                source=excluded.source",
            params![chain_id, address.to_lowercase(), abi_json, source],
        )?;
        Ok(())
    }

    /// Get a cached contract ABI
    pub fn get_abi(&self, chain_id: u64, address: &str) -> Result<Option<CachedAbi>> {
        let conn = self.conn()?;
        let cached = conn
            .query_row(
                "SELECT chain_id, address, abi_json, source FROM abis
                 WHERE chain_id = ?1 AND address = ?2",
                params![chain_id, address.to_lowercase()],
                |row| {
                    Ok(CachedAbi {
                        chain_id: row.get(0)?,
                        address: row.get(1)?,
                        abi_json: row.get(2)?,
                        source: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_db(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("axe_test_{}_{}.db", name, std::process::id()));
        path
    }

    #[test]
    fn test_abi_cache() {
        let path = temp_db("roundtrip");
        let cache = AbiCache::open(&path).unwrap();

        cache
            .save_abi(
                1,
                "0xABCDEF1234567890",
                r#"[{"type":"function","name":"test"}]"#,
                "etherscan",
            )
            .unwrap();

        let abi = cache.get_abi(1, "0xabcdef1234567890").unwrap().unwrap();
        assert_eq!(abi.address, "0xabcdef1234567890");
        assert_eq!(abi.source, "etherscan");
        assert!(cache.get_abi(10, "0xabcdef1234567890").unwrap().is_none());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_save_replaces() {
        let path = temp_db("replace");
        let cache = AbiCache::open(&path).unwrap();

        cache.save_abi(8453, "0x01", "[]", "etherscan").unwrap();
        cache.save_abi(8453, "0x01", r#"[{"name":"f"}]"#, "sourcify").unwrap();

        let abi = cache.get_abi(8453, "0x01").unwrap().unwrap();
        assert_eq!(abi.abi_json, r#"[{"name":"f"}]"#);
        assert_eq!(abi.source, "sourcify");

        std::fs::remove_file(path).ok();
    }
}
