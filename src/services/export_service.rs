use crate::error::Result;
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::services::sheet_reader::{CREATED_AT_HEADER, NAME_HEADER, PHONE_HEADER};
use rust_xlsxwriter::*;
use std::collections::HashMap;
use uuid::Uuid;

pub struct ExportService;

impl ExportService {
    fn status_color(status: Option<CandidateStatus>) -> Color {
        match status {
            Some(CandidateStatus::Active) => Color::RGB(0x10B981),    // Emerald
            Some(CandidateStatus::InProcess) => Color::RGB(0xF59E0B), // Amber
            Some(CandidateStatus::Rejected) => Color::RGB(0xEF4444),  // Red
            None => Color::RGB(0x64748B),
        }
    }

    /// Styled workbook of candidates. The first three columns carry the
    /// import headers, so an export can be fed back into the importer.
    pub fn generate_candidates_xlsx(
        candidates: &[Candidate],
        advisor_emails: &HashMap<Uuid, String>,
    ) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Reclutas")?;

        let header_bg = Color::RGB(0x0F172A); // Slate 900
        let alt_row_1 = Color::RGB(0xF8FAFC); // Slate 50
        let alt_row_2 = Color::White;
        let border_color = Color::RGB(0xE2E8F0); // Slate 200

        let columns = [
            (CREATED_AT_HEADER, 20.0),
            (NAME_HEADER, 30.0),
            (PHONE_HEADER, 18.0),
            ("Email", 30.0),
            ("Folio", 16.0),
            ("Estado", 16.0),
            ("Puesto", 24.0),
            ("Asesor", 30.0),
            ("Notas", 40.0),
            ("Última actualización", 22.0),
        ];

        for (i, (_, width)) in columns.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
        }

        let header_format = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(Color::White)
            .set_background_color(header_bg)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);

        worksheet.set_row_height(0, 30)?;
        for (i, (name, _)) in columns.iter().enumerate() {
            worksheet.write_string_with_format(0, i as u16, *name, &header_format)?;
        }

        for (idx, candidate) in candidates.iter().enumerate() {
            let row = 1 + idx as u32;
            let bg = if idx % 2 == 0 { alt_row_1 } else { alt_row_2 };

            let base_fmt = Format::new()
                .set_font_size(10)
                .set_background_color(bg)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            let center_fmt = base_fmt.clone().set_align(FormatAlign::Center);
            let wrap_fmt = base_fmt.clone().set_text_wrap();

            let registered = candidate.registered_at.format("%d/%m/%Y %H:%M").to_string();
            worksheet.write_string_with_format(row, 0, &registered, &center_fmt)?;
            worksheet.write_string_with_format(row, 1, &candidate.name, &base_fmt.clone().set_bold())?;
            worksheet.write_string_with_format(row, 2, &candidate.phone, &base_fmt)?;
            worksheet.write_string_with_format(row, 3, &candidate.email, &base_fmt)?;
            worksheet.write_string_with_format(row, 4, &candidate.folio, &center_fmt)?;

            let status = candidate.status();
            let status_fmt = Format::new()
                .set_font_size(10)
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Self::status_color(status))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            let status_display = status.map(|s| s.label()).unwrap_or(candidate.status.as_str());
            worksheet.write_string_with_format(row, 5, status_display, &status_fmt)?;

            worksheet.write_string_with_format(row, 6, candidate.position.as_deref().unwrap_or("—"), &base_fmt)?;

            let advisor = candidate
                .advisor_id
                .and_then(|id| advisor_emails.get(&id))
                .map(String::as_str)
                .unwrap_or("—");
            worksheet.write_string_with_format(row, 7, advisor, &base_fmt)?;
            worksheet.write_string_with_format(row, 8, candidate.notes.as_deref().unwrap_or("—"), &wrap_fmt)?;

            let updated = candidate.updated_at.format("%d/%m/%Y %H:%M").to_string();
            worksheet.write_string_with_format(row, 9, &updated, &center_fmt)?;
        }

        worksheet.set_freeze_panes(1, 0)?;
        let last_row = (candidates.len() as u32).max(1);
        worksheet.autofilter(0, 0, last_row, (columns.len() - 1) as u16)?;

        Self::write_summary(workbook.add_worksheet(), candidates)?;

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }

    fn write_summary(sheet: &mut Worksheet, candidates: &[Candidate]) -> Result<()> {
        sheet.set_name("Resumen")?;
        sheet.set_column_width(0, 24.0)?;
        sheet.set_column_width(1, 12.0)?;

        let bold = Format::new().set_bold();
        sheet.write_string_with_format(0, 0, "Estado", &bold)?;
        sheet.write_string_with_format(0, 1, "Total", &bold)?;

        for (i, status) in CandidateStatus::ALL.iter().enumerate() {
            let count = candidates.iter().filter(|c| c.status() == Some(*status)).count();
            let row = 1 + i as u32;
            sheet.write_string(row, 0, status.label())?;
            sheet.write_number(row, 1, count as f64)?;
        }

        let total_row = 1 + CandidateStatus::ALL.len() as u32;
        sheet.write_string_with_format(total_row, 0, "Total", &bold)?;
        sheet.write_number_with_format(total_row, 1, candidates.len() as f64, &bold)?;
        let generated = chrono::Utc::now().format("%d/%m/%Y %H:%M UTC").to_string();
        sheet.write_string(total_row + 2, 0, &format!("Generado: {}", generated))?;
        Ok(())
    }
}
