pub mod parser;

pub use parser::{
    parse_export_csv, parse_export_reader, COLUMN_ID, COLUMN_RATING, COLUMN_TITLE,
    COLUMN_TITLE_TYPE, COLUMN_URL,
};
