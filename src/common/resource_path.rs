// src/common/resource_path.rs

use chrono::NaiveDate;

use crate::common::error::AppError;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const ALLOWED_EXTENSIONS: &[&str] =
    &["pdf", "doc", "docx", "zip", "rar", "png", "jpg", "jpeg", "txt"];

/// Troca tudo que não é [A-Za-z0-9] por '_' e passa para minúsculas.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// Pasta do projeto no bucket: {serviços}_{cliente}_{data}
/// Sem serviços o primeiro trecho fica vazio (ex: "_acme_no_date"), como nas pastas já existentes.
pub fn folder_path(services: &[String], client_name: &str, start_date: Option<NaiveDate>) -> String {
    let services_text = services.join("_");

    let date_folder = match start_date {
        Some(date) => date.format("%Y_%m_%d").to_string(),
        None => "no_date".to_string(),
    };

    format!("{}_{}_{}", sanitize(&services_text), sanitize(client_name), date_folder)
}

/// O timestamp na frente evita colisão entre uploads com o mesmo nome.
pub fn unique_file_name(timestamp_millis: i64, original: &str) -> String {
    format!("{}_{}", timestamp_millis, original)
}

pub fn object_path(folder: &str, file_name: &str) -> String {
    format!("{}/{}", folder, file_name)
}

pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Valida extensão e tamanho de um upload.
pub fn check_upload(file_name: &str, size: usize) -> Result<(), AppError> {
    let ext = extension_of(file_name)
        .ok_or_else(|| AppError::FileTypeNotAllowed(file_name.to_string()))?;

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::FileTypeNotAllowed(ext));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::FileTooLarge(size));
    }
    Ok(())
}

/// Content-Type pela extensão. Usado quando o cliente não manda um.
pub fn guess_content_type(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("zip") => "application/zip",
        Some("rar") => "application/vnd.rar",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn builds_folder_from_services_client_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15);
        let path = folder_path(&services(&["Website development", "SEO optimisation"]), "Acme Corp.", date);
        assert_eq!(path, "website_development_seo_optimisation_acme_corp__2024_01_15");
    }

    #[test]
    fn missing_pieces_use_placeholders() {
        assert_eq!(folder_path(&[], "Jo", None), "_jo_no_date");
    }

    #[test]
    fn folder_only_contains_safe_characters() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 31);
        let path = folder_path(&services(&["UI Design (Figma)", "Crypto (USDT)"]), "Zoë & Ünal — Studio", date);
        assert!(path.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    }

    #[test]
    fn folder_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1);
        let s = services(&["Landing page"]);
        assert_eq!(folder_path(&s, "Client", date), folder_path(&s, "Client", date));
    }

    #[test]
    fn unique_name_prefixes_timestamp() {
        assert_eq!(unique_file_name(1700000000000, "brief.pdf"), "1700000000000_brief.pdf");
        assert_eq!(object_path("a_b_no_date", "1_x.txt"), "a_b_no_date/1_x.txt");
    }

    #[test]
    fn upload_policy() {
        assert!(check_upload("contract.PDF", 1024).is_ok());
        assert!(matches!(check_upload("run.exe", 10), Err(AppError::FileTypeNotAllowed(_))));
        assert!(matches!(check_upload("noext", 10), Err(AppError::FileTypeNotAllowed(_))));
        assert!(matches!(
            check_upload("big.zip", MAX_UPLOAD_BYTES + 1),
            Err(AppError::FileTooLarge(_))
        ));
        assert!(check_upload("edge.zip", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(guess_content_type("photo.JPEG"), "image/jpeg");
        assert_eq!(guess_content_type("archive.bin"), "application/octet-stream");
    }
}
