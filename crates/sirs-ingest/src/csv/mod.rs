mod reader;

pub use reader::{
    ReadOptions, normalized_headers, read_csv_frame, validate_dataframe_shape, validate_encoding,
    validate_row_widths,
};
