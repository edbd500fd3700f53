// urlstash transfer boundary
// Adapters that move entries in and out of the store as CSV rows. The
// export side hands records to external writers in a fixed column order;
// the import side reconciles incoming rows against existing and trashed
// entries so a re-import never duplicates anything.

pub mod export;
pub mod import;

pub use export::{write_csv, ExportRow, ExportSelection, Exporter, EXPORT_HEADERS};
pub use import::{read_csv, ImportRow, ImportSummary, Importer};
