//! tally-backup: JSON backups, CSV import/export and the file-backed transaction store

pub mod backup;
pub mod csv_io;
pub mod file_store;

pub use backup::{BACKUP_VERSION, BackupData, BackupError, backup_filename, export_json, import_json, restore_into};
pub use csv_io::{read_csv, write_csv};
pub use file_store::JsonFileStore;
