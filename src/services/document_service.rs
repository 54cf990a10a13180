// src/services/document_service.rs

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use genpdf::{elements, style, Alignment, Element};
use image::Luma;
use qrcode::QrCode;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        currency::{format_amount, format_number, Currency},
        error::AppError,
    },
    db::{ClientRepository, InvoiceRepository, ProjectRepository, SettingsRepository},
    models::{client::Client, invoice::Invoice, project::Project, settings::AppSettings},
};

const FALLBACK_LINE_DESCRIPTION: &str = "Professional services";

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Valor como aparece no PDF. O símbolo do dirham não existe na fonte, sai o código.
pub fn pdf_amount(amount: Decimal, currency: Currency) -> String {
    match currency {
        Currency::Aed => format!("{} {}", currency.code(), format_number(amount, 2)),
        _ => format_amount(amount, currency, 2),
    }
}

pub fn pdf_file_name(invoice_number: &str) -> String {
    format!("Invoice-{}.pdf", invoice_number)
}

/// Linhas da tabela: Descrição / Qtd / Valor / Total.
/// Sem itens, vira uma linha única com o valor da fatura.
pub fn line_rows(invoice: &Invoice) -> Vec<[String; 4]> {
    let money = |v: Decimal| pdf_amount(v, invoice.currency);

    if invoice.services.is_empty() {
        let description = invoice
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_LINE_DESCRIPTION.to_string());
        return vec![[description, "1".to_string(), money(invoice.amount), money(invoice.amount)]];
    }

    invoice
        .services
        .iter()
        .map(|item| {
            [
                item.description.clone(),
                item.quantity.normalize().to_string(),
                money(item.rate),
                money(item.amount),
            ]
        })
        .collect()
}

pub fn duration_text(project: &Project) -> Option<String> {
    let start = project.start_date?;
    Some(match project.end_date {
        Some(end) => format!("Duration: {} to {}", format_date(start), format_date(end)),
        None => format!("Duration: {}", format_date(start)),
    })
}

// Só o necessário para um deep link UPI
fn encode_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'@' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// upi://pay?pa=..&pn=..&am=..&cu=INR&tn=..
pub fn upi_payment_link(upi_id: &str, payee: &str, amount: Decimal, invoice_number: &str) -> String {
    format!(
        "upi://pay?pa={}&pn={}&am={:.2}&cu=INR&tn={}",
        encode_component(upi_id),
        encode_component(payee),
        amount,
        encode_component(&format!("Invoice {}", invoice_number)),
    )
}

/// Conteúdo do QR de pagamento. O link UPI só cobra em rupias,
/// então faturas em outra moeda ficam sem QR.
pub fn upi_qr_payload(invoice: &Invoice, settings: &AppSettings) -> Option<String> {
    if invoice.currency != Currency::Inr || !invoice.payment_method.eq_ignore_ascii_case("UPI") {
        return None;
    }
    let upi_id = settings.upi_id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;
    let payee = settings.business_name.as_deref().unwrap_or(upi_id);

    Some(upi_payment_link(upi_id, payee, invoice.amount, &invoice.invoice_number))
}

fn pdf_err(e: impl std::fmt::Display) -> AppError {
    AppError::PdfError(e.to_string())
}

#[derive(Clone)]
pub struct DocumentService {
    invoice_repo: InvoiceRepository,
    project_repo: ProjectRepository,
    client_repo: ClientRepository,
    settings_repo: SettingsRepository,
    pool: PgPool,
    fonts_dir: PathBuf,
    font_family: String,
}

impl DocumentService {
    pub fn new(
        invoice_repo: InvoiceRepository,
        project_repo: ProjectRepository,
        client_repo: ClientRepository,
        settings_repo: SettingsRepository,
        pool: PgPool,
        fonts_dir: PathBuf,
        font_family: String,
    ) -> Self {
        Self { invoice_repo, project_repo, client_repo, settings_repo, pool, fonts_dir, font_family }
    }

    /// (nome do arquivo, bytes do PDF)
    pub async fn generate_invoice_pdf(&self, invoice_id: Uuid) -> Result<(String, Vec<u8>), AppError> {
        // 1. Busca os Dados
        let invoice = self
            .invoice_repo
            .find_by_id(&self.pool, invoice_id)
            .await?
            .ok_or(AppError::InvoiceNotFound)?;

        let (project, client, settings) = tokio::try_join!(
            self.project_repo.find_by_id(&self.pool, invoice.project_id),
            self.client_repo.find_by_id(&self.pool, invoice.client_id),
            self.settings_repo.get_settings(&self.pool),
        )?;
        let project = project.ok_or(AppError::ProjectNotFound)?;
        let client = client.ok_or(AppError::ClientNotFound)?;

        // 2. Monta o PDF (síncrono: o Document do genpdf não atravessa .await)
        let bytes = self.render_invoice(&invoice, &project, &client, &settings)?;

        tracing::info!("📄 PDF da fatura {} gerado ({} bytes)", invoice.invoice_number, bytes.len());
        Ok((pdf_file_name(&invoice.invoice_number), bytes))
    }

    fn render_invoice(
        &self,
        invoice: &Invoice,
        project: &Project,
        client: &Client,
        settings: &AppSettings,
    ) -> Result<Vec<u8>, AppError> {
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None)
            .map_err(|_| AppError::FontNotFound(format!("{} em {}", self.font_family, self.fonts_dir.display())))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Invoice {}", invoice.invoice_number));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        let bold = style::Style::new().bold();
        let small = style::Style::new().with_font_size(9);

        // --- CABEÇALHO ---
        let business_name = settings.business_name.clone().unwrap_or_else(|| "INVOICE".to_string());
        doc.push(elements::Paragraph::new(business_name).styled(style::Style::new().bold().with_font_size(18)));
        if let Some(tagline) = &settings.tagline {
            doc.push(elements::Paragraph::new(tagline.as_str()).styled(small));
        }
        for contact in [&settings.phone, &settings.email, &settings.website].into_iter().flatten() {
            doc.push(elements::Paragraph::new(contact.as_str()).styled(small));
        }

        doc.push(elements::Break::new(1.5));
        doc.push(
            elements::Paragraph::new(format!("INVOICE #{}", invoice.invoice_number))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Break::new(1));

        // --- DETALHES + COBRANÇA ---
        let mut meta = elements::TableLayout::new(vec![1, 1]);
        let mut details = elements::LinearLayout::vertical();
        details.push(elements::Paragraph::new("Invoice Details").styled(bold));
        details.push(elements::Paragraph::new(format!("Issue Date: {}", format_date(invoice.invoice_date))));
        details.push(elements::Paragraph::new(format!("Due Date: {}", format_date(invoice.due_date))));
        details.push(elements::Paragraph::new(format!("Payment Method: {}", invoice.payment_method)));
        details.push(elements::Paragraph::new(format!("Invoice Type: {}", invoice.invoice_type.label())));

        let mut bill_to = elements::LinearLayout::vertical();
        bill_to.push(elements::Paragraph::new("Bill To").styled(bold));
        bill_to.push(elements::Paragraph::new(client.name.as_str()));
        if let Some(company) = &client.company {
            bill_to.push(elements::Paragraph::new(company.as_str()));
        }
        bill_to.push(elements::Paragraph::new(client.email.as_str()));
        if let Some(phone) = &client.phone {
            bill_to.push(elements::Paragraph::new(phone.as_str()));
        }

        meta.row().element(details).element(bill_to).push().map_err(pdf_err)?;
        doc.push(meta);
        doc.push(elements::Break::new(1));

        // --- PROJETO ---
        doc.push(elements::Paragraph::new(format!("Project: {}", project.title)).styled(bold));
        if let Some(duration) = duration_text(project) {
            doc.push(elements::Paragraph::new(duration));
        }
        doc.push(elements::Break::new(1));

        // --- TABELA DE ITENS ---
        // Pesos das colunas: Descrição (4), Qtd (1), Valor (2), Total (2)
        let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        table
            .row()
            .element(elements::Paragraph::new("Description").styled(bold))
            .element(elements::Paragraph::new("Qty").styled(bold))
            .element(elements::Paragraph::new("Rate").styled(bold))
            .element(elements::Paragraph::new("Amount").styled(bold))
            .push()
            .map_err(pdf_err)?;

        for [description, quantity, rate, amount] in line_rows(invoice) {
            table
                .row()
                .element(elements::Paragraph::new(description))
                .element(elements::Paragraph::new(quantity))
                .element(elements::Paragraph::new(rate))
                .element(elements::Paragraph::new(amount))
                .push()
                .map_err(pdf_err)?;
        }

        doc.push(table);
        doc.push(elements::Break::new(1.5));

        // --- TOTAL ---
        doc.push(
            elements::Paragraph::new(format!(
                "TOTAL AMOUNT: {}",
                pdf_amount(invoice.amount, invoice.currency)
            ))
            .aligned(Alignment::Right)
            .styled(style::Style::new().bold().with_font_size(12)),
        );
        doc.push(
            elements::Paragraph::new(format!("STATUS: {}", invoice.status.label())).styled(bold),
        );

        // --- CONDIÇÕES E NOTAS ---
        if let Some(terms) = invoice.payment_terms.as_deref().filter(|t| !t.is_empty()) {
            doc.push(elements::Break::new(1));
            doc.push(elements::Paragraph::new("Payment Terms:").styled(bold));
            doc.push(elements::Paragraph::new(terms));
        }
        if let Some(notes) = invoice.notes.as_deref().filter(|n| !n.is_empty()) {
            doc.push(elements::Break::new(1));
            doc.push(elements::Paragraph::new("Additional Notes:").styled(bold));
            doc.push(elements::Paragraph::new(notes));
        }

        // --- PAGAMENTO (QR CODE UPI) ---
        if let Some(link) = upi_qr_payload(invoice, settings) {
            doc.push(elements::Break::new(1.5));
            doc.push(elements::Paragraph::new("PAY VIA UPI").styled(bold));
            if let Some(upi_id) = settings.upi_id.as_deref() {
                doc.push(elements::Paragraph::new(format!("UPI ID: {}", upi_id.trim())));
            }

            let code = QrCode::new(link.as_bytes()).map_err(pdf_err)?;
            let image_buffer = code.render::<Luma<u8>>().build();
            let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

            let pdf_image = elements::Image::from_dynamic_image(dynamic_image)
                .map_err(pdf_err)?
                .with_scale(genpdf::Scale::new(0.5, 0.5));
            doc.push(pdf_image);
        }

        // --- RODAPÉ ---
        doc.push(elements::Break::new(2));
        doc.push(elements::Paragraph::new("Thank you for your business!").aligned(Alignment::Center));
        if let Some(address) = &settings.address {
            doc.push(elements::Paragraph::new(address.as_str()).aligned(Alignment::Center).styled(small));
        }
        doc.push(
            elements::Paragraph::new(format!("Invoice generated on {}", format_date(Utc::now().date_naive())))
                .aligned(Alignment::Center)
                .styled(style::Style::new().italic().with_font_size(8)),
        );

        // 3. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_err)?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        invoice::{tests::line, normalize_line_items, InvoiceStatus, InvoiceType},
        project::tests::sample_project,
    };

    fn invoice(services: Vec<crate::models::invoice::InvoiceLineItem>) -> Invoice {
        let now = Utc::now();
        Invoice {
            id: Uuid::new_v4(),
            project_id: Uuid::nil(),
            client_id: Uuid::nil(),
            invoice_number: "INV-2024-0001".into(),
            invoice_type: InvoiceType::Advance,
            invoice_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 4, 16).unwrap(),
            amount: Decimal::from(150000),
            currency: Currency::Inr,
            description: Some("Website advance".into()),
            services,
            status: InvoiceStatus::Pending,
            payment_method: "UPI".into(),
            payment_terms: None,
            notes: None,
            project_title: None,
            client_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn no_lines_falls_back_to_invoice_amount() {
        let rows = line_rows(&invoice(Vec::new()));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "Website advance");
        assert_eq!(rows[0][1], "1");
        assert_eq!(rows[0][3], "₹1,50,000");
    }

    #[test]
    fn lines_are_formatted() {
        let items = normalize_line_items(vec![line("Design", "2", "1250.5")]);
        let rows = line_rows(&invoice(items));
        assert_eq!(
            rows,
            vec![[
                "Design".to_string(),
                "2".to_string(),
                "₹1,250.50".to_string(),
                "₹2,501".to_string()
            ]]
        );
    }

    #[test]
    fn upi_link_is_encoded() {
        let link = upi_payment_link("studio@okaxis", "Studio Nimbus", Decimal::new(150000, 0), "INV-2024-0001");
        assert_eq!(
            link,
            "upi://pay?pa=studio@okaxis&pn=Studio%20Nimbus&am=150000.00&cu=INR&tn=Invoice%20INV-2024-0001"
        );
    }

    fn upi_settings() -> AppSettings {
        AppSettings {
            business_name: Some("Studio Nimbus".into()),
            upi_id: Some("studio@okaxis".into()),
            ..AppSettings::default()
        }
    }

    #[test]
    fn qr_only_for_rupee_invoices() {
        let mut inv = invoice(Vec::new());
        let link = upi_qr_payload(&inv, &upi_settings()).unwrap();
        assert!(link.starts_with("upi://pay?pa=studio@okaxis&pn=Studio%20Nimbus"));
        assert!(link.contains("cu=INR"));

        inv.currency = Currency::Usd;
        assert!(upi_qr_payload(&inv, &upi_settings()).is_none());
    }

    #[test]
    fn qr_needs_upi_method_and_id() {
        let mut inv = invoice(Vec::new());
        let blank = AppSettings { upi_id: Some("  ".into()), ..upi_settings() };
        assert!(upi_qr_payload(&inv, &blank).is_none());
        assert!(upi_qr_payload(&inv, &AppSettings::default()).is_none());

        inv.payment_method = "Bank Transfer".into();
        assert!(upi_qr_payload(&inv, &upi_settings()).is_none());
    }

    #[test]
    fn dirham_prints_as_code() {
        let mut inv = invoice(Vec::new());
        inv.currency = Currency::Aed;
        let rows = line_rows(&inv);
        assert_eq!(rows[0][3], "AED 1,50,000");
        assert_eq!(pdf_amount(Decimal::new(125050, 2), Currency::Usd), "$1,250.50");
    }

    #[test]
    fn duration_needs_start_date() {
        let mut project = sample_project("Site", 1, 0);
        assert!(duration_text(&project).is_none());

        project.start_date = NaiveDate::from_ymd_opt(2024, 1, 5);
        project.end_date = NaiveDate::from_ymd_opt(2024, 2, 10);
        assert_eq!(duration_text(&project).unwrap(), "Duration: 05/01/2024 to 10/02/2024");
    }

    #[test]
    fn file_name_uses_number() {
        assert_eq!(pdf_file_name("INV-2024-0001"), "Invoice-INV-2024-0001.pdf");
    }
}
