// SPDX-License-Identifier: MPL-2.0
//! Iris texture and the texture catalog.

use super::render::TextureId;
use std::sync::Arc;

/// A decoded iris texture, stored as premultiplied RGBA.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    id: TextureId,
    title: String,
    width: u32,
    height: u32,
    premultiplied: Arc<Vec<u8>>,
}

impl Texture {
    /// Builds a texture from straight (non-premultiplied) RGBA bytes.
    ///
    /// Returns `None` if the data length doesn't match the dimensions or
    /// either dimension is zero.
    #[must_use]
    pub fn from_straight_rgba(
        id: TextureId,
        title: impl Into<String>,
        width: u32,
        height: u32,
        mut rgba: Vec<u8>,
    ) -> Option<Self> {
        let expected_len = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || rgba.len() != expected_len {
            return None;
        }
        for px in rgba.chunks_exact_mut(4) {
            let alpha = u16::from(px[3]);
            for channel in &mut px[..3] {
                *channel = premultiply(u16::from(*channel), alpha);
            }
        }
        Some(Self {
            id,
            title: title.into(),
            width,
            height,
            premultiplied: Arc::new(rgba),
        })
    }

    #[must_use]
    pub fn id(&self) -> &TextureId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA pixel data.
    #[must_use]
    pub fn premultiplied_bytes(&self) -> &[u8] {
        &self.premultiplied
    }
}

fn premultiply(channel: u16, alpha: u16) -> u8 {
    // Rounded channel * alpha / 255.
    let product = channel * alpha + 128;
    ((product + (product >> 8)) >> 8) as u8
}

/// The fully loaded set of textures, in catalog order.
///
/// A catalog only exists once every entry has been decoded; there is no
/// partially loaded state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureCatalog {
    textures: Vec<Texture>,
}

impl TextureCatalog {
    #[must_use]
    pub fn new(textures: Vec<Texture>) -> Self {
        Self { textures }
    }

    #[must_use]
    pub fn get(&self, id: &TextureId) -> Option<&Texture> {
        self.textures.iter().find(|t| t.id() == id)
    }

    #[must_use]
    pub fn first(&self) -> Option<&Texture> {
        self.textures.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Texture> {
        self.textures.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premultiplies_on_construction() {
        let texture = Texture::from_straight_rgba(
            TextureId::new("1"),
            "Hazel",
            1,
            1,
            vec![200, 100, 50, 128],
        )
        .unwrap();
        assert_eq!(texture.premultiplied_bytes(), &[100, 50, 25, 128]);
    }

    #[test]
    fn opaque_pixels_are_unchanged() {
        let texture =
            Texture::from_straight_rgba(TextureId::new("1"), "Blue", 1, 1, vec![9, 8, 7, 255])
                .unwrap();
        assert_eq!(texture.premultiplied_bytes(), &[9, 8, 7, 255]);
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(Texture::from_straight_rgba(TextureId::new("x"), "", 0, 1, vec![]).is_none());
        assert!(Texture::from_straight_rgba(TextureId::new("x"), "", 2, 1, vec![0; 4]).is_none());
    }

    #[test]
    fn catalog_lookup_by_id() {
        let make = |id: &str| {
            Texture::from_straight_rgba(TextureId::new(id), id, 1, 1, vec![0, 0, 0, 255]).unwrap()
        };
        let catalog = TextureCatalog::new(vec![make("a"), make("b")]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.first().map(|t| t.title()), Some("a"));
        assert!(catalog.get(&TextureId::new("b")).is_some());
        assert!(catalog.get(&TextureId::new("c")).is_none());
    }
}
