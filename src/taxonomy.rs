//! Static extension taxonomy: which file extensions belong to which category

/// A named bucket of file extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub group: &'static str,
    /// Lower-case, dot-prefixed extensions
    pub extensions: &'static [&'static str],
}

impl Category {
    const fn new(
        name: &'static str,
        group: &'static str,
        extensions: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            group,
            extensions,
        }
    }

    /// Checks whether an extension belongs to this category.
    ///
    /// Accepts the extension with or without the leading dot, in any case.
    pub fn matches(&self, extension: &str) -> bool {
        let normalized = normalize_extension(extension);
        self.extensions.iter().any(|e| *e == normalized)
    }
}

const DOCUMENTS: &str = "Documents";
const SPREADSHEETS: &str = "Spreadsheets";
const PRESENTATIONS: &str = "Presentations";
const DATABASES: &str = "Databases";
const IMAGES: &str = "Images";
const VIDEOS: &str = "Videos";
const AUDIO: &str = "Audio";
const MODELS: &str = "3D Models";
const CODE: &str = "Web & Code";
const ARCHIVES: &str = "Archives";
const FONTS: &str = "Fonts";
const INSTALLERS: &str = "Installers";
const OFFICE_EXTRA: &str = "Office Extra";

/// Group names in display order
pub const GROUPS: &[&str] = &[
    DOCUMENTS,
    SPREADSHEETS,
    PRESENTATIONS,
    DATABASES,
    IMAGES,
    VIDEOS,
    AUDIO,
    MODELS,
    CODE,
    ARCHIVES,
    FONTS,
    INSTALLERS,
    OFFICE_EXTRA,
];

static CATEGORIES: &[Category] = &[
    Category::new("PDF", DOCUMENTS, &[".pdf"]),
    Category::new("Word", DOCUMENTS, &[".doc", ".docx", ".docm"]),
    Category::new("Text", DOCUMENTS, &[".txt", ".rtf", ".md"]),
    Category::new("Email", DOCUMENTS, &[".eml"]),
    Category::new("Excel", SPREADSHEETS, &[".xls", ".xlsx", ".xlsm"]),
    Category::new("CSV", SPREADSHEETS, &[".csv"]),
    Category::new("OpenOffice Calc", SPREADSHEETS, &[".ods"]),
    Category::new("PowerPoint", PRESENTATIONS, &[".ppt", ".pptx", ".pptm"]),
    Category::new("Access", DATABASES, &[".accdb", ".mdb"]),
    Category::new("JPEG", IMAGES, &[".jpg", ".jpeg"]),
    Category::new("PNG", IMAGES, &[".png"]),
    Category::new("GIF", IMAGES, &[".gif"]),
    Category::new("BMP", IMAGES, &[".bmp"]),
    Category::new("WebP", IMAGES, &[".webp"]),
    Category::new("TIFF", IMAGES, &[".tif", ".tiff"]),
    Category::new("CorelDRAW", IMAGES, &[".cdr"]),
    Category::new("Photoshop", IMAGES, &[".psd"]),
    Category::new("MP4", VIDEOS, &[".mp4"]),
    Category::new("MKV", VIDEOS, &[".mkv"]),
    Category::new("MOV", VIDEOS, &[".mov"]),
    Category::new("AVI", VIDEOS, &[".avi"]),
    Category::new("WMV", VIDEOS, &[".wmv"]),
    Category::new("FLV", VIDEOS, &[".flv"]),
    Category::new("MP3", AUDIO, &[".mp3"]),
    Category::new("WAV", AUDIO, &[".wav"]),
    Category::new("FLAC", AUDIO, &[".flac"]),
    Category::new("OGG", AUDIO, &[".ogg"]),
    Category::new("Opus", AUDIO, &[".opus"]),
    Category::new("M4A", AUDIO, &[".m4a"]),
    Category::new("STL", MODELS, &[".stl"]),
    Category::new("OBJ", MODELS, &[".obj"]),
    Category::new("3MF", MODELS, &[".3mf"]),
    Category::new("G-Code", MODELS, &[".gcode"]),
    Category::new("HTML", CODE, &[".html", ".htm"]),
    Category::new("CSS", CODE, &[".css"]),
    Category::new("JavaScript", CODE, &[".js"]),
    Category::new("JSON", CODE, &[".json"]),
    Category::new("XML", CODE, &[".xml"]),
    Category::new("Python", CODE, &[".py"]),
    Category::new("Java", CODE, &[".java"]),
    Category::new("PHP", CODE, &[".php"]),
    Category::new("Arduino", CODE, &[".ino"]),
    Category::new("PowerShell", CODE, &[".ps1"]),
    Category::new("ZIP", ARCHIVES, &[".zip"]),
    Category::new("RAR", ARCHIVES, &[".rar"]),
    Category::new("7Z", ARCHIVES, &[".7z"]),
    Category::new("TAR", ARCHIVES, &[".tar"]),
    Category::new("GZ", ARCHIVES, &[".gz"]),
    Category::new("TrueType", FONTS, &[".ttf"]),
    Category::new("OpenType", FONTS, &[".otf"]),
    Category::new("Executables", INSTALLERS, &[".exe"]),
    Category::new("MSI", INSTALLERS, &[".msi"]),
    Category::new("Batch", INSTALLERS, &[".bat", ".cmd"]),
    Category::new("Publisher", OFFICE_EXTRA, &[".pub"]),
    Category::new("Visio", OFFICE_EXTRA, &[".vsd", ".vsdx"]),
    Category::new("OneNote", OFFICE_EXTRA, &[".one"]),
];

/// Lower-cases an extension and ensures it carries a leading dot
pub fn normalize_extension(extension: &str) -> String {
    let lower = extension.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// All categories in display order
pub fn all_categories() -> &'static [Category] {
    CATEGORIES
}

/// Looks up a category by exact name
pub fn find_category(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

/// Extensions of the named category; empty for unknown names
pub fn category_extensions(name: &str) -> &'static [&'static str] {
    find_category(name).map(|c| c.extensions).unwrap_or(&[])
}

/// Categories belonging to a group (matched case-insensitively)
pub fn group_categories(group: &str) -> Vec<&'static Category> {
    CATEGORIES
        .iter()
        .filter(|c| c.group.eq_ignore_ascii_case(group))
        .collect()
}

/// Finds the category owning an extension
pub fn category_for_extension(extension: &str) -> Option<&'static Category> {
    let normalized = normalize_extension(extension);
    CATEGORIES
        .iter()
        .find(|c| c.extensions.contains(&normalized.as_str()))
}
