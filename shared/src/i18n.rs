use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Cs,
    En,
}

/// User-facing strings the engine needs for notices and fallbacks.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub imported_item_fallback: &'static str,
    pub csv_missing_columns: &'static str,
    pub csv_no_rows: &'static str,
    pub import_fail: &'static str,
    pub qr_upload_success: &'static str,
    pub qr_upload_fail: &'static str,
    pub image_only_error: &'static str,
    language: Language,
}

const CS: Messages = Messages {
    imported_item_fallback: "Importovaná položka",
    csv_missing_columns: "CSV musí mít sloupce Description, Qty/Quantity a Price/Rate.",
    csv_no_rows: "Nenašly se žádné použitelné řádky. Zkontrolujte data pod hlavičkami.",
    import_fail: "Import CSV se nezdařil.",
    qr_upload_success: "QR kód byl nahrán.",
    qr_upload_fail: "Nahrání QR kódu se nezdařilo.",
    image_only_error: "Nahrajte prosím obrázek.",
    language: Language::Cs,
};

const EN: Messages = Messages {
    imported_item_fallback: "Imported item",
    csv_missing_columns: "CSV must have Description, Qty/Quantity, and Price/Rate columns.",
    csv_no_rows: "No usable rows found. Ensure the CSV has data rows under the headers.",
    import_fail: "Failed to import CSV.",
    qr_upload_success: "QR code uploaded.",
    qr_upload_fail: "Failed to upload QR code.",
    image_only_error: "Please upload an image file.",
    language: Language::En,
};

impl Language {
    pub fn messages(&self) -> &'static Messages {
        match self {
            Language::Cs => &CS,
            Language::En => &EN,
        }
    }
}

impl Messages {
    pub fn import_success(&self, n: usize) -> String {
        match self.language {
            Language::Cs => format!("Importováno {} položek!", n),
            Language::En => format!("Imported {} item{}!", n, if n == 1 { "" } else { "s" }),
        }
    }
}
