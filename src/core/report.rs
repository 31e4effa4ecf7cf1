use crate::core::batch::BatchFetcher;
use crate::domain::model::{BatchResult, Identifier, ReportRow};
use crate::domain::ports::{ConfigProvider, PhoneLookup, ProgressSink, Storage};
use crate::utils::error::{ExtractorError, Result};
use rust_xlsxwriter::{Format, Workbook};

/// Longest string, in characters, that fits in one worksheet cell.
pub const MAX_CELL_CHARS: usize = 32_767;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    pub identifier_header: String,
    pub phone_header: String,
    pub not_found_placeholder: String,
}

impl ReportLayout {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            identifier_header: config.identifier_header().to_string(),
            phone_header: config.phone_header().to_string(),
            not_found_placeholder: config.not_found_placeholder().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub output_path: String,
    pub rows: usize,
    pub found: usize,
}

pub fn build_rows(pairs: BatchResult, placeholder: &str) -> Vec<ReportRow> {
    pairs
        .into_iter()
        .map(|(identifier, result)| ReportRow::from_lookup(identifier, &result, placeholder))
        .collect()
}

/// Widest cell of each column (header included) plus one, in characters.
pub fn column_widths(rows: &[ReportRow], layout: &ReportLayout) -> (usize, usize) {
    let identifier_width = rows
        .iter()
        .map(|row| row.identifier.chars().count())
        .chain(std::iter::once(layout.identifier_header.chars().count()))
        .max()
        .unwrap_or(0);
    let phone_width = rows
        .iter()
        .map(|row| row.phone.chars().count())
        .chain(std::iter::once(layout.phone_header.chars().count()))
        .max()
        .unwrap_or(0);
    (identifier_width + 1, phone_width + 1)
}

/// Fails on the first identifier that could not be written to a cell.
pub fn check_cell_lengths(identifiers: &[Identifier]) -> Result<()> {
    for (index, identifier) in identifiers.iter().enumerate() {
        let length = identifier.chars().count();
        if length > MAX_CELL_CHARS {
            return Err(ExtractorError::IdentifierTooLong {
                position: index + 1,
                length,
                limit: MAX_CELL_CHARS,
            });
        }
    }
    Ok(())
}

/// Renders rows into an in-memory `.xlsx` workbook with a single sheet.
pub fn render_workbook(rows: &[ReportRow], layout: &ReportLayout) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let (identifier_width, phone_width) = column_widths(rows, layout);

    let worksheet = workbook.add_worksheet();
    worksheet.write_string_with_format(0, 0, layout.identifier_header.as_str(), &header_format)?;
    worksheet.write_string_with_format(0, 1, layout.phone_header.as_str(), &header_format)?;

    for (index, row) in rows.iter().enumerate() {
        let sheet_row = (index + 1) as u32;
        worksheet.write_string(sheet_row, 0, row.identifier.as_str())?;
        worksheet.write_string(sheet_row, 1, row.phone.as_str())?;
    }

    worksheet.set_column_width(0, identifier_width as f64)?;
    worksheet.set_column_width(1, phone_width as f64)?;

    Ok(workbook.save_to_buffer()?)
}

/// Looks up every identifier and stores the resulting workbook.
pub struct ReportWriter<L: PhoneLookup, S: Storage> {
    fetcher: BatchFetcher<L>,
    storage: S,
    layout: ReportLayout,
}

impl<L: PhoneLookup + 'static, S: Storage> ReportWriter<L, S> {
    pub fn new(fetcher: BatchFetcher<L>, storage: S, layout: ReportLayout) -> Self {
        Self {
            fetcher,
            storage,
            layout,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn export(
        &self,
        identifiers: &[Identifier],
        output_path: &str,
        progress: &dyn ProgressSink,
    ) -> Result<ExportSummary> {
        check_cell_lengths(identifiers)?;
        let pairs = self.fetcher.fetch_all(identifiers, progress).await?;
        let found = pairs.iter().filter(|(_, result)| result.is_found()).count();
        let rows = build_rows(pairs, &self.layout.not_found_placeholder);

        let workbook = render_workbook(&rows, &self.layout)?;
        tracing::debug!(
            "Writing workbook ({} bytes, {} rows) to {}",
            workbook.len(),
            rows.len(),
            output_path
        );
        self.storage.write_file(output_path, &workbook).await?;

        Ok(ExportSummary {
            output_path: output_path.to_string(),
            rows: rows.len(),
            found,
        })
    }
}
