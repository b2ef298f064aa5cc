mod queries;

use crate::api::{Opt, Store};
use crate::hash::{hash_file, make_path};
use crate::os::lock::{PathLock, add_lock_ext};
use crate::types::StoreObj;
use anyhow::{Result, bail};
use kiln_core::store::config::CONFIG;
use kiln_core::store::{StorePath, is_valid_name};
use log::info;
use sqlx::SqlitePool;
use std::fs::Permissions;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tokio::fs;

pub struct LocalStoreConfig {
    pub store_dir: String,
    pub state_dir: String,
}

impl LocalStoreConfig {
    pub fn new(store_dir: &str, state_dir: &str) -> Self {
        Self {
            store_dir: store_dir.to_string(),
            state_dir: state_dir.to_string(),
        }
    }

    pub fn db_dir(&self) -> String {
        format!("{}/db", self.state_dir)
    }

    pub fn db_path(&self) -> String {
        format!("{}/sqlite.db", self.db_dir())
    }
}

impl Default for LocalStoreConfig {
    fn default() -> Self {
        Self::new(&CONFIG.store_dir, &CONFIG.state_dir)
    }
}

/// A store rooted in a local directory, with validity and reference
/// edges kept in a sqlite database under the state directory.
pub struct LocalStore {
    config: LocalStoreConfig,
    db: SqlitePool,
}

impl LocalStore {
    pub async fn open(config: LocalStoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.store_dir).await?;
        fs::create_dir_all(config.db_dir()).await?;
        let db = SqlitePool::connect(&format!("sqlite://{}?mode=rwc", config.db_path())).await?;
        sqlx::migrate!().run(&db).await?;
        Ok(Self { config, db })
    }
}

impl Store for LocalStore {
    fn store_dir(&self) -> &str {
        &self.config.store_dir
    }

    async fn add_to_store<P>(&self, p: P, opt: Opt) -> Result<StorePath>
    where
        P: AsRef<Path>,
    {
        if !is_valid_name(&opt.name) {
            bail!("invalid store object name: {}", opt.name);
        }
        let hash = hash_file(&p, opt.algo).await?;
        let path = make_path(&hash, &opt.name);
        if !self.valid(&path).await? {
            info!("add to store: {path}");
            let full_path = self.print_store_path(&path);
            let lock = PathLock::exclusive(add_lock_ext(&full_path))?;
            // another process may have added the path while we waited
            if !self.valid(&path).await? {
                self.copy_path(p.as_ref(), full_path.as_ref()).await?;
                self.register_store_obj(
                    StoreObj {
                        path: path.clone(),
                        hash,
                    },
                    opt.refs,
                )
                .await?;
            }
            lock.unlock();
        }
        Ok(path)
    }

    async fn is_valid_path(&self, path: &StorePath) -> Result<bool> {
        self.valid(path).await
    }

    // the local store has no way to produce a path it does not have
    async fn ensure_path(&self, path: &StorePath) -> Result<()> {
        if self.valid(path).await? {
            Ok(())
        } else {
            bail!(
                "path '{}' is not valid and cannot be realized by a local store",
                self.print_store_path(path)
            )
        }
    }

    async fn references(&self, path: &StorePath) -> Result<Vec<StorePath>> {
        if !self.valid(path).await? {
            bail!("path '{}' is not valid", self.print_store_path(path));
        }
        self.get_references(path).await
    }
}

impl LocalStore {
    async fn copy_path(&self, src: &Path, dst: &Path) -> Result<()> {
        let metadata = fs::metadata(&src).await?;
        if !metadata.is_file() {
            bail!("cannot add '{}' to the store: not a regular file", src.display());
        }
        // a leftover from an interrupted add is overwritten under the lock
        if fs::try_exists(dst).await? {
            fs::set_permissions(dst, Permissions::from_mode(0o644)).await?;
            fs::remove_file(dst).await?;
        }
        fs::copy(&src, &dst).await?;
        // store objects are immutable once registered
        fs::set_permissions(dst, Permissions::from_mode(0o444)).await?;
        Ok(())
    }

    async fn register_store_obj(&self, obj: StoreObj, refs: Vec<StorePath>) -> Result<()> {
        let mut tx = self.db.begin().await?;
        let referrer = if Self::is_store_obj(&mut tx, &obj.path).await? {
            Self::update_store_obj(&mut tx, &obj).await?
        } else {
            Self::add_store_obj(&mut tx, &obj).await?
        };
        for r in refs {
            let Some(references) = Self::get_store_obj_id(&mut tx, &r).await? else {
                bail!(
                    "cannot register '{}': reference '{r}' is not a valid path",
                    obj.path
                );
            };
            Self::add_ref(&mut tx, referrer, references).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
