use super::base::{NormalizerUtils, SourceNormalizer};
use crate::error::Result;
use crate::types::{CanonicalItem, RawRecord, SourceKind};

/// Normalizer for artist rows, shared by the spreadsheet and REST backends.
///
/// Both backends have used camelCase and snake_case spellings over time, so
/// each field accepts either.
pub struct ArtistNormalizer {
    source_kind: SourceKind,
}

impl ArtistNormalizer {
    pub fn new(source_kind: SourceKind) -> Self {
        Self { source_kind }
    }

    pub fn spreadsheet() -> Self {
        Self::new(SourceKind::Spreadsheet)
    }

    pub fn rest() -> Self {
        Self::new(SourceKind::Rest)
    }
}

impl SourceNormalizer for ArtistNormalizer {
    fn normalize(&self, record: &RawRecord) -> Result<CanonicalItem> {
        let field = |keys: &[&str]| NormalizerUtils::first_truthy(record, keys);

        let id = NormalizerUtils::required(record, &["id"], self.source_kind)?;
        let name = NormalizerUtils::required(record, &["name"], self.source_kind)?;

        let mut item = CanonicalItem::new(id, name, self.source_kind);
        item.record_id = field(&["recordId", "record_id"]);
        item.certificate_no = field(&["certificateNo", "certificate_no"]);
        item.category = field(&["category"]);
        item.subcategory = field(&["subcategory", "subCategory", "sub_category"]);
        item.subcategory_description = field(&[
            "subcategoryDes",
            "subcategoryDescription",
            "subcategory_des",
            "subcategory_description",
        ]);
        item.intro_url = field(&["introUrl", "intro_url"]);
        item.stage_name = field(&["stageName", "stage_name"]);
        item.sex = field(&["sex"]);
        item.phone = field(&["phone"]);
        item.email = field(&["email"]);
        item.image_url = field(&["imgUrl", "imageUrl", "img_url", "image_url"]);
        Ok(item)
    }

    fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    fn name(&self) -> &str {
        match self.source_kind {
            SourceKind::Spreadsheet => "spreadsheet_artist",
            _ => "rest_artist",
        }
    }
}
