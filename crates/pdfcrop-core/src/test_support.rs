//! Fixture documents for unit and integration tests
//!
//! Compiled only for this crate's tests or with the `test-support` feature.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

/// Builder for small PDFs whose pages each carry one filled rectangle
#[derive(Debug, Clone)]
pub struct FixturePdf {
    pages: u32,
    width: i64,
    height: i64,
    title: Option<String>,
}

impl FixturePdf {
    /// US Letter pages
    pub fn new(pages: u32) -> Self {
        Self {
            pages,
            width: 612,
            height: 792,
            title: None,
        }
    }

    pub fn page_size(mut self, width: i64, height: i64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let tree_id = doc.new_object_id();

        let kids: Vec<Object> = (0..self.pages)
            .map(|index| {
                let content = doc.add_object(Stream::new(Dictionary::new(), self.content(index)));
                let page = Dictionary::from_iter(vec![
                    ("Type", Object::Name(b"Page".to_vec())),
                    ("Parent", Object::Reference(tree_id)),
                    ("MediaBox", self.media_box()),
                    ("Contents", Object::Reference(content)),
                ]);
                Object::Reference(doc.add_object(page))
            })
            .collect();

        doc.objects.insert(
            tree_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Count", Object::Integer(i64::from(self.pages))),
                ("Kids", Object::Array(kids)),
            ])),
        );

        let catalog = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(tree_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog));

        if let Some(title) = &self.title {
            let info = doc.add_object(Dictionary::from_iter(vec![(
                "Title",
                Object::String(title.as_bytes().to_vec(), StringFormat::Literal),
            )]));
            doc.trailer.set("Info", Object::Reference(info));
        }

        let mut bytes = Vec::new();
        let _ = doc.save_to(&mut bytes);
        bytes
    }

    fn media_box(&self) -> Object {
        Object::Array(
            [0, 0, self.width, self.height]
                .into_iter()
                .map(Object::Integer)
                .collect(),
        )
    }

    /// A gray block inset from the page edges, shifted per page
    fn content(&self, index: u32) -> Vec<u8> {
        let inset = 72 + i64::from(index % 4) * 10;
        let block = |v: i64| Object::Integer(v.max(1));
        Content {
            operations: vec![
                Operation::new("g", vec![Object::Real(0.5)]),
                Operation::new(
                    "re",
                    vec![
                        block(inset),
                        block(inset),
                        block(self.width - 2 * inset),
                        block(self.height - 2 * inset),
                    ],
                ),
                Operation::new("f", vec![]),
            ],
        }
        .encode()
        .unwrap_or_default()
    }
}

/// `pages` US Letter pages, no metadata
pub fn create_test_pdf(pages: u32) -> Vec<u8> {
    FixturePdf::new(pages).build()
}
