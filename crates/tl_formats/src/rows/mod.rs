//! Delimited records, one row per value.
//!
//! Nested members are flattened into prefixed columns when written, and
//! regrouped when read by walking the shape of the target type:
//!
//! ```
//! use tl_map::Options;
//! use tl_reflect::derive::Reflect;
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! #[reflect(default)]
//! struct Child {
//!     #[reflect(rename = "Name")]
//!     name: String,
//! }
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! #[reflect(default)]
//! struct Parent {
//!     #[reflect(rename = "Id")]
//!     id: i32,
//!     #[reflect(rename = "Child")]
//!     child: Child,
//! }
//!
//! let options = Options::default();
//! let parent = Parent { id: 1, child: Child { name: "X".into() } };
//!
//! let text = tl_formats::rows::to_string(&[parent], &options).unwrap();
//! assert_eq!(text, "Id,ChildName\r\n1,X\r\n");
//!
//! let parents: Vec<Parent> = tl_formats::rows::from_str(&text, &options).unwrap();
//! assert_eq!(parents[0].child.name, "X");
//! ```
//!
//! Sequences and dictionaries have no place in a row: writing one is an
//! error and reading skips them. An empty cell is an absent member, and a
//! nested member whose cells are all empty stays unset.

// -----------------------------------------------------------------------------
// Modules

mod dialect;
mod node;

// -----------------------------------------------------------------------------
// Exports

pub use dialect::Dialect;
pub use node::{RowNode, RowTarget};

use tl_map::{Error, Options, Result};
use tl_reflect::Reflect;
use tl_reflect::info::Typed;

use dialect::format_error;

// -----------------------------------------------------------------------------
// Helpers

/// Writes `records` with a header line, using [`Dialect::default`].
pub fn to_string<T: Reflect>(records: &[T], options: &Options) -> Result<String> {
    to_string_with(records, options, &Dialect::default())
}

/// Writes `records` with a header line.
///
/// The header is every column any record produced, in order of first
/// appearance. Records lacking a column leave its cell empty.
pub fn to_string_with<T: Reflect>(
    records: &[T],
    options: &Options,
    dialect: &Dialect,
) -> Result<String> {
    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (row, record) in records.iter().enumerate() {
        let mut target = RowTarget::new(row);
        tl_map::serialize(record, &mut target, options)?;

        let cells = target.into_cells();
        for (column, _) in &cells {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
        rows.push(cells);
    }

    if columns.is_empty() {
        return Ok(String::new());
    }
    let mut writer = dialect.writer(Vec::new());
    writer.write_record(&columns).map_err(format_error)?;
    for cells in &rows {
        let line = columns.iter().map(|column| {
            cells
                .iter()
                .find(|(name, _)| name == column)
                .map_or("", |(_, text)| text.as_str())
        });
        writer.write_record(line).map_err(format_error)?;
    }
    let bytes = writer.into_inner().map_err(|err| format_error(err.error()))?;
    String::from_utf8(bytes).map_err(format_error)
}

/// Reads records written with [`Dialect::default`].
pub fn from_str<T: Reflect + Typed>(text: &str, options: &Options) -> Result<Vec<T>> {
    from_str_with(text, options, &Dialect::default())
}

/// Reads one `T` per record. The first record is the header, blank lines
/// are skipped.
pub fn from_str_with<T: Reflect + Typed>(
    text: &str,
    options: &Options,
    dialect: &Dialect,
) -> Result<Vec<T>> {
    let mut reader = dialect.reader(text);
    let header: Vec<String> = reader
        .headers()
        .map_err(format_error)?
        .iter()
        .map(str::to_owned)
        .collect();
    if header.is_empty() {
        return Ok(Vec::new());
    }
    let shape = options.shapes().get_type::<T>();

    let mut parsed = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(format_error)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() > header.len() {
            return Err(Error::Format(format!(
                "record {row} has {} fields, the header has {}",
                record.len(),
                header.len()
            )));
        }
        let cells: Vec<String> = record.iter().map(str::to_owned).collect();
        let root = node::regroup(&header, &cells, row, &shape, options);
        parsed.push(tl_map::deserialize(&root, options)?);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use tl_map::{Error, Options, OptionsBuilder, OptionsConfig};
    use tl_reflect::derive::Reflect;

    use super::{Dialect, from_str, from_str_with, to_string, to_string_with};

    #[derive(Reflect, Default, Debug, PartialEq, Clone)]
    #[reflect(default)]
    struct Child {
        #[reflect(rename = "Name")]
        name: String,
    }

    #[derive(Reflect, Default, Debug, PartialEq, Clone)]
    #[reflect(default)]
    struct Parent {
        #[reflect(rename = "Id")]
        id: i32,
        #[reflect(rename = "Child")]
        child: Child,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Order {
        id: u32,
        note: Option<String>,
        child: Option<Child>,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Bag {
        items: Vec<u8>,
    }

    fn parent() -> Parent {
        Parent {
            id: 1,
            child: Child { name: "X".into() },
        }
    }

    #[test]
    fn scenario_d_flattens_and_regroups() {
        let options = Options::default();
        let text = to_string(&[parent()], &options).unwrap();
        assert_eq!(text, "Id,ChildName\r\n1,X\r\n");

        let parents: Vec<Parent> = from_str("Id,ChildName\r\n1,X\r\n", &options).unwrap();
        assert_eq!(parents, [parent()]);
    }

    #[test]
    fn missing_cells_stay_unset() {
        let options = Options::default();
        let orders = [
            Order {
                id: 1,
                note: Some("a,b".into()),
                child: Some(Child { name: "X".into() }),
            },
            Order {
                id: 2,
                note: None,
                child: None,
            },
        ];

        let text = to_string(&orders, &options).unwrap();
        assert_eq!(text, "id,note,childName\r\n1,\"a,b\",X\r\n2,,\r\n");

        let back: Vec<Order> = from_str(&text, &options).unwrap();
        assert_eq!(back, orders);
    }

    #[test]
    fn options_from_config_control_matching() {
        let config: OptionsConfig =
            ron::from_str("(case_sensitive_names: false, fail_on_unmatched_members: true)").unwrap();
        let strict = OptionsBuilder::from(config).build();

        let parents: Vec<Parent> = from_str("id,childname\n7,Y\n", &strict).unwrap();
        assert_eq!((parents[0].id, parents[0].child.name.as_str()), (7, "Y"));

        let err = from_str::<Parent>("Id,Bogus\n7,?\n", &strict).unwrap_err();
        let Error::UnrecognizedNode { name, .. } = err.kind() else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(name, "Bogus");

        let lenient: Vec<Parent> = from_str("Id,Bogus\n7,?\n", &Options::default()).unwrap();
        assert_eq!(lenient[0].id, 7);
    }

    #[test]
    fn custom_delimiters() {
        let options = Options::default();
        let dialect = Dialect { delimiter: b';' };
        let text = to_string_with(&[parent()], &options, &dialect).unwrap();
        assert_eq!(text, "Id;ChildName\r\n1;X\r\n");

        let back: Vec<Parent> = from_str_with(&text, &options, &dialect).unwrap();
        assert_eq!(back, [parent()]);
    }

    #[test]
    fn sequences_cannot_be_written() {
        let bag = Bag { items: vec![1, 2] };
        let err = to_string(&[bag], &Options::default()).unwrap_err();
        assert!(matches!(err.kind(), Error::Format(_)));
        assert_eq!(err.context().unwrap().target.path, "[0].items");
    }

    #[test]
    fn bad_cells_report_row_paths() {
        let text = "Id,ChildName\n1,X\nnope,Y\n";
        let err = from_str::<Parent>(text, &Options::default()).unwrap_err();
        assert_eq!(err.context().unwrap().source.path, "[1].Id");
        assert!(err.friendly_message().is_some());
    }

    #[test]
    fn empty_input_has_no_records() {
        let parents: Vec<Parent> = from_str("", &Options::default()).unwrap();
        assert!(parents.is_empty());
        assert_eq!(to_string::<Parent>(&[], &Options::default()).unwrap(), "");
    }
}
