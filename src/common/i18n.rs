// src/common/i18n.rs

use std::collections::HashMap;

const DEFAULT_LANG: &str = "en";

// Catálogo de mensagens: (código, inglês, português)
const MESSAGES: &[(&str, &str, &str)] = &[
    ("VALIDATION_ERROR", "One or more fields are invalid.", "Um ou mais campos são inválidos."),
    ("INVALID_CREDENTIALS", "Invalid e-mail or password.", "E-mail ou senha inválidos."),
    ("INVALID_TOKEN", "Missing or invalid authentication token.", "Token de autenticação inválido ou ausente."),
    ("CLIENT_NOT_FOUND", "Client not found.", "Cliente não encontrado."),
    ("PROJECT_NOT_FOUND", "Project not found.", "Projeto não encontrado."),
    ("INVOICE_NOT_FOUND", "Invoice not found.", "Fatura não encontrada."),
    ("RESOURCE_NOT_FOUND", "Resource not found.", "Recurso não encontrado."),
    ("FILE_NOT_FOUND", "File not found.", "Arquivo não encontrado."),
    ("FILE_ALREADY_EXISTS", "A file with this name already exists.", "Já existe um arquivo com este nome."),
    ("FILE_TYPE_NOT_ALLOWED", "This file type is not allowed.", "Este tipo de arquivo não é permitido."),
    ("FILE_TOO_LARGE", "File is too large. Maximum size is 10MB.", "Arquivo muito grande. O tamanho máximo é 10MB."),
    ("INVALID_UPLOAD", "Invalid upload request.", "Requisição de upload inválida."),
    ("INVALID_STORAGE_PATH", "Invalid file path.", "Caminho de arquivo inválido."),
    ("UNSUPPORTED_TABLE", "Unknown table.", "Tabela desconhecida."),
    ("INVOICE_AMOUNT_REQUIRED", "Please enter the invoice amount.", "Informe o valor da fatura."),
    ("INVOICE_NUMBER_TAKEN", "This invoice number is already in use.", "Este número de fatura já está em uso."),
    ("INTERNAL_SERVER_ERROR", "An unexpected error occurred.", "Ocorreu um erro inesperado."),
];

#[derive(Debug, Clone)]
pub struct I18nStore {
    // idioma -> (código -> mensagem)
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut en = HashMap::new();
        let mut pt = HashMap::new();
        for (code, en_msg, pt_msg) in MESSAGES {
            en.insert(*code, *en_msg);
            pt.insert(*code, *pt_msg);
        }

        let mut catalogs = HashMap::new();
        catalogs.insert("en", en);
        catalogs.insert("pt", pt);
        Self { catalogs }
    }

    /// Traduz um código. Cai para o inglês e, por último, para o próprio código.
    pub fn translate(&self, lang: &str, code: &str) -> String {
        let lookup = |l: &str| self.catalogs.get(l).and_then(|c| c.get(code)).copied();

        lookup(lang)
            .or_else(|| lookup(DEFAULT_LANG))
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_language() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "PROJECT_NOT_FOUND"), "Projeto não encontrado.");
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let store = I18nStore::new();
        assert_eq!(store.translate("de", "CLIENT_NOT_FOUND"), "Client not found.");
    }

    #[test]
    fn unknown_code_is_returned_verbatim() {
        let store = I18nStore::new();
        assert_eq!(store.translate("en", "SOMETHING_ELSE"), "SOMETHING_ELSE");
    }
}
