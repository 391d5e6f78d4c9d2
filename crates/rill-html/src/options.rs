//! Parser and tree builder configuration.

/// Options for the lexer and parser.
///
/// The default is lenient HTML: case-folded names, void elements, implied
/// closes, no entity decoding, CDATA read as comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Treat the input as XML: no void elements, no implied closes, no raw
    /// text elements, names kept as written, CDATA and `/>` honoured.
    pub xml_mode: bool,
    /// Lowercase tag names. Unset means "unless `xml_mode`".
    pub lower_case_tags: Option<bool>,
    /// Lowercase attribute names. Unset means "unless `xml_mode`".
    pub lower_case_attribute_names: Option<bool>,
    /// Report `<![CDATA[...]]>` as a CDATA section outside XML mode.
    pub recognize_cdata: bool,
    /// Honour `/>` as a close outside XML mode.
    pub recognize_self_closing: bool,
    /// Decode character references in text and attribute values.
    pub decode_entities: bool,
}

impl ParserOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`xml_mode`](Self::xml_mode).
    #[must_use]
    pub const fn with_xml_mode(mut self, xml_mode: bool) -> Self {
        self.xml_mode = xml_mode;
        self
    }

    /// Set [`lower_case_tags`](Self::lower_case_tags).
    #[must_use]
    pub const fn with_lower_case_tags(mut self, lower: bool) -> Self {
        self.lower_case_tags = Some(lower);
        self
    }

    /// Set [`lower_case_attribute_names`](Self::lower_case_attribute_names).
    #[must_use]
    pub const fn with_lower_case_attribute_names(mut self, lower: bool) -> Self {
        self.lower_case_attribute_names = Some(lower);
        self
    }

    /// Set [`recognize_cdata`](Self::recognize_cdata).
    #[must_use]
    pub const fn with_recognize_cdata(mut self, recognize: bool) -> Self {
        self.recognize_cdata = recognize;
        self
    }

    /// Set [`recognize_self_closing`](Self::recognize_self_closing).
    #[must_use]
    pub const fn with_recognize_self_closing(mut self, recognize: bool) -> Self {
        self.recognize_self_closing = recognize;
        self
    }

    /// Set [`decode_entities`](Self::decode_entities).
    #[must_use]
    pub const fn with_decode_entities(mut self, decode: bool) -> Self {
        self.decode_entities = decode;
        self
    }

    /// Whether tag names are lowercased, with the default resolved.
    #[must_use]
    pub fn lowercases_tags(&self) -> bool {
        self.lower_case_tags.unwrap_or(!self.xml_mode)
    }

    /// Whether attribute names are lowercased, with the default resolved.
    #[must_use]
    pub fn lowercases_attribute_names(&self) -> bool {
        self.lower_case_attribute_names.unwrap_or(!self.xml_mode)
    }

    /// Whether CDATA sections are reported as such.
    #[must_use]
    pub const fn cdata_enabled(&self) -> bool {
        self.xml_mode || self.recognize_cdata
    }

    /// Whether `/>` closes the element it ends.
    #[must_use]
    pub const fn self_closing_enabled(&self) -> bool {
        self.xml_mode || self.recognize_self_closing
    }
}

/// Options for [`DomHandler`](crate::DomHandler).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomHandlerOptions {
    /// Collapse every whitespace run in text nodes to one space.
    pub normalize_whitespace: bool,
    /// Record each node's start offset.
    pub with_start_indices: bool,
    /// Record each node's end offset.
    pub with_end_indices: bool,
}

impl DomHandlerOptions {
    /// Default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            normalize_whitespace: false,
            with_start_indices: false,
            with_end_indices: false,
        }
    }

    /// Set [`normalize_whitespace`](Self::normalize_whitespace).
    #[must_use]
    pub const fn with_normalize_whitespace(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }

    /// Set both [`with_start_indices`](Self::with_start_indices) and
    /// [`with_end_indices`](Self::with_end_indices).
    #[must_use]
    pub const fn with_indices(mut self, indices: bool) -> Self {
        self.with_start_indices = indices;
        self.with_end_indices = indices;
        self
    }

    /// Set [`with_start_indices`](Self::with_start_indices).
    #[must_use]
    pub const fn with_start_indices(mut self, record: bool) -> Self {
        self.with_start_indices = record;
        self
    }

    /// Set [`with_end_indices`](Self::with_end_indices).
    #[must_use]
    pub const fn with_end_indices(mut self, record: bool) -> Self {
        self.with_end_indices = record;
        self
    }
}
