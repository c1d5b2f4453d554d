use annotate::{LabelAnnotation, WebEntityAnnotation};
use warehouse::RowError;

/// Where human-facing run output goes. Production prints to the console;
/// tests substitute a recording double so normalization and persistence
/// never print on their own.
pub trait ReportSink {
    fn report_labels(&mut self, labels: &[LabelAnnotation]);
    fn report_entities(&mut self, entities: &[WebEntityAnnotation]);
    fn report_insert(&mut self, rows_sent: usize, row_errors: &[RowError]);
}

/// Prints to stdout in the layout operators already grep for.
#[derive(Debug, Default)]
pub struct ConsoleReport;

impl ReportSink for ConsoleReport {
    fn report_labels(&mut self, labels: &[LabelAnnotation]) {
        println!("Labels:");
        for label in labels {
            if let Some(description) = &label.description {
                println!("{description}");
            }
        }
    }

    fn report_entities(&mut self, entities: &[WebEntityAnnotation]) {
        println!("{} web entities found:", entities.len());
        for entity in entities {
            if let Some(score) = entity.score {
                println!("\tScore      : {score}");
            }
            if let Some(description) = &entity.description {
                println!("\tDescription: {description}");
            }
        }
    }

    fn report_insert(&mut self, rows_sent: usize, row_errors: &[RowError]) {
        if row_errors.is_empty() {
            println!("Inserted {rows_sent} records, no errors on warehouse insert");
        } else {
            println!(
                "Inserted {} of {} records:",
                rows_sent - row_errors.len(),
                rows_sent
            );
            for error in row_errors {
                println!("\tRow {} rejected: {}", error.index, error.message);
            }
        }
    }
}
