use std::fs::File;
use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook};

use crate::config::{CHART_FILE, SPREADSHEET_FILE, WORKBOOK_FILE};
use crate::models::COLUMNS;
use crate::{Listing, Result};

const SHEET_NAME: &str = "Careerspace";
const HEADER_FILL: u32 = 0xBCB7B6;

/// Creates the output directory and removes artifacts of a previous run.
/// Other files in the directory are left alone.
pub fn prepare_output_dir(out_dir: impl AsRef<Path>) -> Result<()> {
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;
    for stale in [SPREADSHEET_FILE, WORKBOOK_FILE, CHART_FILE] {
        let path = out_dir.join(stale);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Writes the header row and one row per listing.
/// The header is written even when there is nothing to save.
pub fn save_to_csv(listings: &[Listing], file_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record(COLUMNS)?;
    for listing in listings {
        writer.serialize(listing)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn load_from_csv(file_path: impl AsRef<Path>) -> Result<Vec<Listing>> {
    let mut reader = csv::Reader::from_path(file_path)?;
    let listings = reader.deserialize().collect::<csv::Result<Vec<Listing>>>()?;
    Ok(listings)
}

/// Same rows as [`save_to_csv`], as a workbook with a bold, filled header
/// row and columns sized to their longest value.
pub fn save_to_xlsx(listings: &[Listing], file_path: impl AsRef<Path>) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL));
    let mut widths = COLUMNS.map(|c| c.chars().count());

    for (col, name) in (0u16..).zip(COLUMNS) {
        sheet.write_string_with_format(0, col, name, &header)?;
    }

    for (row, listing) in (1u32..).zip(listings) {
        let texts = [
            (0u16, listing.title.as_str()),
            (1, listing.qualification_level.label()),
            (2, listing.employer.as_str()),
            (3, listing.city.as_deref().unwrap_or_default()),
            (8, listing.url.as_str()),
        ];
        for (col, text) in texts {
            sheet.write_string(row, col, text)?;
            widths[usize::from(col)] = widths[usize::from(col)].max(text.chars().count());
        }

        for (col, wage) in [(4u16, listing.wage_min), (5, listing.wage_max)] {
            if let Some(wage) = wage {
                sheet.write_number(row, col, wage as f64)?;
                let digits = wage.to_string().len();
                widths[usize::from(col)] = widths[usize::from(col)].max(digits);
            }
        }

        sheet.write_boolean(row, 6, listing.remote_possible)?;
        sheet.write_boolean(row, 7, listing.hybrid_possible)?;
    }

    for (col, width) in (0u16..).zip(widths) {
        sheet.set_column_width(col, (width + 1) as f64 * 1.2)?;
    }

    workbook.save(file_path)?;
    Ok(())
}
