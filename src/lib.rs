//! Converts semicolon separated bank exports (`eksport.csv`) into the
//! `Date,Payee,Memo,Outflow,Inflow` layout YNAB imports.

pub mod amount;
pub mod convert;
pub mod error;
pub mod input;
pub mod output;
pub mod paths;
pub mod upload;

pub use convert::{convert, convert_path, convert_reader, detect_amount_column};
pub use error::{ConvertError, Result};
pub use input::RawTable;
pub use output::OutputRow;
