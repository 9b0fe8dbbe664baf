use crate::objects::{Dictionary, Name};
use std::fmt;

/// The 14 standard Type 1 fonts every conforming reader provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Symbol,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    ZapfDingbats,
}

/// Base font names, in declaration order.
const BASE_FONTS: [(StandardFont, &str); 14] = [
    (StandardFont::Courier, "Courier"),
    (StandardFont::CourierBold, "Courier-Bold"),
    (StandardFont::CourierOblique, "Courier-Oblique"),
    (StandardFont::CourierBoldOblique, "Courier-BoldOblique"),
    (StandardFont::Helvetica, "Helvetica"),
    (StandardFont::HelveticaBold, "Helvetica-Bold"),
    (StandardFont::HelveticaOblique, "Helvetica-Oblique"),
    (StandardFont::HelveticaBoldOblique, "Helvetica-BoldOblique"),
    (StandardFont::Symbol, "Symbol"),
    (StandardFont::TimesRoman, "Times-Roman"),
    (StandardFont::TimesBold, "Times-Bold"),
    (StandardFont::TimesItalic, "Times-Italic"),
    (StandardFont::TimesBoldItalic, "Times-BoldItalic"),
    (StandardFont::ZapfDingbats, "ZapfDingbats"),
];

impl StandardFont {
    pub const ALL: [StandardFont; 14] = [
        StandardFont::Courier,
        StandardFont::CourierBold,
        StandardFont::CourierOblique,
        StandardFont::CourierBoldOblique,
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
        StandardFont::HelveticaBoldOblique,
        StandardFont::Symbol,
        StandardFont::TimesRoman,
        StandardFont::TimesBold,
        StandardFont::TimesItalic,
        StandardFont::TimesBoldItalic,
        StandardFont::ZapfDingbats,
    ];

    /// The `BaseFont` name, e.g. `Times-Roman`.
    pub fn base_font(&self) -> &'static str {
        BASE_FONTS[*self as usize].1
    }

    pub fn pdf_name(&self) -> Name {
        Name::new(self.base_font())
    }

    /// Looks a font up by its base font name.
    pub fn from_name(name: &str) -> Option<Self> {
        BASE_FONTS
            .iter()
            .find(|(_, base)| *base == name)
            .map(|(font, _)| *font)
    }

    /// Symbol and ZapfDingbats use their own built-in encodings.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, StandardFont::Symbol | StandardFont::ZapfDingbats)
    }

    /// The minimal font dictionary: `Type`, `Subtype` and `BaseFont`.
    pub(crate) fn font_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::with_capacity(3);
        dict.set("Type", Name::new("Font"));
        dict.set("Subtype", Name::new("Type1"));
        dict.set("BaseFont", self.pdf_name());
        dict
    }
}

impl fmt::Display for StandardFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_font())
    }
}
