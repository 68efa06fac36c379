//! Metadata tables and column parameters.
//!
//! Three small tables share the ids `id1..id3`, so any pair of them merges
//! without losing rows.

use stew_ir::argument::Argument;
use stew_ir::metadata::{ColumnValues, Metadata};
use stew_ir::template::ParamTemplate;
use stew_ir::types::{ColumnKind, TypeDescriptor, ViewType};
use stew_ir::value::{Factory, FactoryError};

use crate::ParamGenerator;

const ID_HEADER: &str = "id";
const IDS: [&str; 3] = ["id1", "id2", "id3"];

pub const METADATA1: Factory<Metadata> = Factory::new("metadata1", metadata1);
pub const METADATA2: Factory<Metadata> = Factory::new("metadata2", metadata2);
pub const METADATA3: Factory<Metadata> = Factory::new("metadata3", metadata3);

/// Categorical only.
fn metadata1() -> Result<Metadata, FactoryError> {
    Ok(Metadata::new(ID_HEADER, IDS)?
        .with_column("col1", ColumnValues::categorical(&[Some("a"), Some("b"), Some("c")]))?
        .with_column("col2", ColumnValues::categorical(&[Some("x"), Some("y"), Some("z")]))?)
}

/// Numeric only, with a missing cell.
fn metadata2() -> Result<Metadata, FactoryError> {
    Ok(Metadata::new(ID_HEADER, IDS)?
        .with_column("num1", ColumnValues::numeric(&[Some(1.0), Some(2.5), Some(3.0)]))?
        .with_column("num2", ColumnValues::numeric(&[Some(10.0), None, Some(30.0)]))?)
}

/// One column of each type, both sparse.
fn metadata3() -> Result<Metadata, FactoryError> {
    Ok(Metadata::new(ID_HEADER, IDS)?
        .with_column("mixed_cat", ColumnValues::categorical(&[Some("p"), None, Some("r")]))?
        .with_column("mixed_num", ColumnValues::numeric(&[None, Some(0.5), Some(1.0)]))?)
}

pub fn metadata_params() -> ParamGenerator {
    ParamGenerator::new("metadata_params", metadata_templates)
}

fn metadata_templates() -> Vec<ParamTemplate> {
    vec![
        ParamTemplate::new(
            "metadata_cat",
            TypeDescriptor::metadata(),
            ViewType::Metadata,
            [Argument::from(METADATA1)],
        ),
        ParamTemplate::new(
            "metadata_num",
            TypeDescriptor::metadata(),
            ViewType::Metadata,
            [Argument::from(METADATA2)],
        ),
        ParamTemplate::new(
            "metadata_mixed",
            TypeDescriptor::metadata(),
            ViewType::Metadata,
            [
                Argument::from(METADATA3),
                Argument::Merged(vec![METADATA1, METADATA2]),
            ],
        ),
        ParamTemplate::new(
            "column_cat",
            TypeDescriptor::column(ColumnKind::Categorical),
            ViewType::CategoricalColumn,
            [
                Argument::column(METADATA1, "col1"),
                Argument::column(METADATA1, "col2"),
                Argument::column(METADATA3, "mixed_cat"),
            ],
        ),
        ParamTemplate::new(
            "column_num",
            TypeDescriptor::column(ColumnKind::Numeric),
            ViewType::NumericColumn,
            [
                Argument::column(METADATA2, "num1"),
                Argument::column(METADATA2, "num2"),
                Argument::column(METADATA3, "mixed_num"),
            ],
        ),
        ParamTemplate::new(
            "column_any",
            TypeDescriptor::column(ColumnKind::Any),
            ViewType::Column,
            [
                Argument::column(METADATA1, "col1"),
                Argument::column(METADATA2, "num2"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_build() {
        for factory in [METADATA1, METADATA2, METADATA3] {
            let md = factory.produce().unwrap();
            assert_eq!(md.ids(), IDS);
            assert_eq!(md.id_header(), ID_HEADER);
        }
    }

    #[test]
    fn test_metadata_domains_validate() {
        for template in metadata_params().templates() {
            template.validate().unwrap();
        }
        assert!(metadata_params().is_metadata());
    }
}
