//! Pure intake validation: NIK format and per-category upload rules.
//! No I/O happens here; handlers decide what to do with the failures.

const MIB: usize = 1024 * 1024;

/// Upload categories with their acceptance rules. Sizes are byte limits,
/// types are matched against the declared multipart content-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Cv,
    Photo3x4,
    Ktp,
}

impl UploadKind {
    pub fn allowed_types(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Cv => &["application/pdf"],
            UploadKind::Photo3x4 => &["image/jpeg", "image/jpg", "image/png"],
            UploadKind::Ktp => &["application/pdf", "image/jpeg", "image/jpg", "image/png"],
        }
    }

    pub fn max_bytes(&self) -> usize {
        match self {
            UploadKind::Cv => 5 * MIB,
            UploadKind::Photo3x4 => 2 * MIB,
            UploadKind::Ktp => 3 * MIB,
        }
    }

    /// Subdirectory of the upload tree this category lands in.
    pub fn dir_name(&self) -> &'static str {
        match self {
            UploadKind::Cv => "cv",
            UploadKind::Photo3x4 => "photos",
            UploadKind::Ktp => "ktp",
        }
    }

    fn type_message(&self) -> &'static str {
        match self {
            UploadKind::Cv => "File CV harus PDF",
            UploadKind::Photo3x4 => "Foto 3x4 harus JPG atau PNG",
            UploadKind::Ktp => "File KTP harus PDF, JPG, atau PNG",
        }
    }

    fn size_message(&self) -> &'static str {
        match self {
            UploadKind::Cv => "Ukuran CV maksimal 5MB",
            UploadKind::Photo3x4 => "Ukuran foto 3x4 maksimal 2MB",
            UploadKind::Ktp => "Ukuran file KTP maksimal 3MB",
        }
    }
}

/// NIK must be exactly 16 decimal digits. No checksum or region validation.
pub fn validate_nik(nik: &str) -> Result<(), String> {
    if nik.len() == 16 && nik.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err("NIK harus terdiri dari 16 digit angka".to_string())
    }
}

/// Checks the declared content-type and byte length of one upload against
/// its category rules. Type is checked before size, matching the original
/// portal's rejection order.
pub fn validate_upload(kind: UploadKind, content_type: &str, len: usize) -> Result<(), String> {
    if !kind.allowed_types().contains(&content_type) {
        return Err(kind.type_message().to_string());
    }
    if len > kind.max_bytes() {
        return Err(kind.size_message().to_string());
    }
    Ok(())
}

/// File extension derived from the declared content-type, the same way the
/// portal always did it: the subtype verbatim ("jpeg" stays "jpeg").
pub fn extension_for(content_type: &str) -> &str {
    content_type.split('/').nth(1).unwrap_or("bin")
}

/// Replaces anything outside [A-Za-z0-9] with '_' for use in filenames. A
/// valid NIK is untouched; this guards the path against malformed input that
/// slipped past earlier checks.
pub fn sanitize_for_filename(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
