//! Bank-transfer payment: instructions shown to the customer and the slip
//! they upload as proof.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Bank account the customer transfers the order total to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransferDetails {
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub branch: String,
}

impl Default for BankTransferDetails {
    fn default() -> Self {
        Self {
            bank_name: "Commercial Bank".to_string(),
            account_name: "Cosmetica (Pvt) Ltd".to_string(),
            account_number: "1000 2345 6789".to_string(),
            branch: "Colombo Main".to_string(),
        }
    }
}

impl BankTransferDetails {
    /// Instruction lines shown on the payment step.
    #[must_use]
    pub fn instructions(&self) -> Vec<String> {
        vec![
            "Transfer the order total to the account below, then upload a photo or screenshot of the slip.".to_string(),
            format!("Bank: {}", self.bank_name),
            format!("Account name: {}", self.account_name),
            format!("Account number: {}", self.account_number),
            format!("Branch: {}", self.branch),
        ]
    }
}

/// An uploaded proof-of-payment file.
///
/// The content type is taken from the file name; content is not inspected.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentSlip {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl PaymentSlip {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a slip from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "payment-slip".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(file_name, bytes))
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for PaymentSlip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentSlip")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}
