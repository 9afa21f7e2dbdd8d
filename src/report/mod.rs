//! Report formatting
//!
//! Plain-text renderings of scoring results:
//! - `general`: one `<metric name>: <value>` line per metric
//! - `full`: tab-delimited confusion matrix per case and stratum

use std::io::{self, Write};

use crate::evaluation::{bucket_name, ConfusionAccumulator, ConfusionMatrix, MetricTable};

/// Write the metric table, one line per metric
pub fn write_metrics<W: Write>(out: &mut W, table: &MetricTable) -> io::Result<()> {
    for metric in table.iter() {
        // Debug keeps the fractional part of whole numbers ("1.0")
        writeln!(out, "{}: {:?}", metric.name(), metric.value)?;
    }
    Ok(())
}

/// Write every confusion matrix, each under its case label
pub fn write_confusion<W: Write>(out: &mut W, confusion: &ConfusionAccumulator) -> io::Result<()> {
    for (case, stratum, matrix) in confusion.matrices() {
        writeln!(out, "{}:", bucket_name(case, stratum))?;
        write_matrix(out, matrix)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_matrix<W: Write>(out: &mut W, matrix: &ConfusionMatrix) -> io::Result<()> {
    for symbol in matrix.symbols() {
        write!(out, "\t{}", symbol)?;
    }
    writeln!(out)?;

    for (row, counts) in matrix.rows() {
        write!(out, "{}", row.label())?;
        for count in counts {
            write!(out, "\t{}", count)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
