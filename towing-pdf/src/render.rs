use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use genpdf::{elements, fonts, style, Alignment, Element, SimplePageDecorator};
use thiserror::Error;

use crate::rows::ReportDoc;

const BRAND_LINE: &str = "TOWING - Naval Services";
const HEADING_COLOR: style::Color = style::Color::Rgb(0, 51, 102);
const OVERDUE_COLOR: style::Color = style::Color::Rgb(200, 80, 0);

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("pdf rendering failed: {0}")]
    Pdf(#[from] genpdf::error::Error),
}

/// Renders a [`ReportDoc`] to an A4 landscape PDF. Fonts load from a
/// directory shipped next to the binary (a Liberation-style family split
/// into the four usual files).
pub struct ReportRenderer {
    font_dir: PathBuf,
    font_family: String,
}

impl ReportRenderer {
    pub fn new(font_dir: impl Into<PathBuf>, font_family: impl Into<String>) -> Self {
        Self {
            font_dir: font_dir.into(),
            font_family: font_family.into(),
        }
    }

    pub fn render_to_file(&self, report: &ReportDoc, path: &Path) -> Result<(), ReportError> {
        let font_family = fonts::from_files(&self.font_dir, &self.font_family, None)?;
        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(report.title.clone());
        // A4 landscape.
        doc.set_paper_size(genpdf::Size::new(297, 210));
        doc.set_font_size(8);

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(10);
        decorator.set_header(|page| {
            elements::Paragraph::new(format!("{BRAND_LINE} - page {page}"))
                .aligned(Alignment::Center)
                .styled(style::Style::new().with_font_size(6).with_color(style::Color::Greyscale(120)))
        });
        doc.set_page_decorator(decorator);

        doc.push(
            elements::Paragraph::new(report.title.as_str()).styled(
                style::Style::new()
                    .bold()
                    .with_font_size(14)
                    .with_color(HEADING_COLOR),
            ),
        );
        doc.push(
            elements::Paragraph::new(report.subtitle.as_str())
                .styled(style::Style::new().with_font_size(8).with_color(style::Color::Greyscale(100))),
        );
        doc.push(elements::Break::new(1));

        for section in &report.sections {
            doc.push(
                elements::Paragraph::new(section.heading.as_str()).styled(
                    style::Style::new()
                        .bold()
                        .with_font_size(10)
                        .with_color(HEADING_COLOR),
                ),
            );
            if let Some(detail) = &section.detail {
                doc.push(
                    elements::Paragraph::new(detail.as_str())
                        .styled(style::Style::new().with_font_size(7).with_color(style::Color::Greyscale(80))),
                );
            }

            if section.rows.is_empty() {
                doc.push(
                    elements::Paragraph::new(report.empty_note)
                        .styled(style::Style::new().with_font_size(7).with_color(style::Color::Greyscale(140))),
                );
            } else {
                doc.push(self.table(report, section)?);
            }
            doc.push(elements::Break::new(1));
        }

        doc.render_to_file(path)?;
        Ok(())
    }

    fn table(
        &self,
        report: &ReportDoc,
        section: &crate::rows::Section,
    ) -> Result<elements::TableLayout, ReportError> {
        let weights: Vec<usize> = report.columns.iter().map(|c| c.weight).collect();
        let mut table = elements::TableLayout::new(weights);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let header_style = style::Style::new().bold().with_font_size(7);
        let mut header = table.row();
        for column in &report.columns {
            header = header.element(
                elements::Paragraph::new(column.header)
                    .styled(header_style.clone())
                    .padded(1),
            );
        }
        header.push()?;

        for row in &section.rows {
            let cell_style = if row.overdue {
                style::Style::new().bold().with_font_size(7).with_color(OVERDUE_COLOR)
            } else {
                style::Style::new().with_font_size(7)
            };
            let mut table_row = table.row();
            for cell in &row.cells {
                table_row = table_row.element(
                    elements::Paragraph::new(cell.as_str()).styled(cell_style.clone()).padded(1),
                );
            }
            table_row.push()?;
        }

        Ok(table)
    }
}

/// Dated output name for the full contract listing.
pub fn contracts_report_filename(date: NaiveDate) -> String {
    format!("TOWING_Contracts_Report_{}.pdf", date.format("%Y%m%d"))
}

/// Dated output name for the weekly schedule.
pub fn weekly_report_filename(date: NaiveDate) -> String {
    format!("TOWING_Week_Schedule_{}.pdf", date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_carry_the_date_stamp() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            contracts_report_filename(date),
            "TOWING_Contracts_Report_20240115.pdf"
        );
        assert_eq!(weekly_report_filename(date), "TOWING_Week_Schedule_20240115.pdf");
    }
}
