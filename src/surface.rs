// The stamp layer: owns every live stamp from insertion until removal.

use crate::stamp::Stamp;
use crate::types::Size;
use slotmap::SlotMap;

slotmap::new_key_type! {
    pub struct StampKey;
}

pub struct Surface {
    stamps: SlotMap<StampKey, Stamp>,
    order: Vec<StampKey>, // paint order, oldest first
    size: Size,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            stamps: SlotMap::with_key(),
            order: Vec::new(),
            size: Size { width: width as f32, height: height as f32 },
        }
    }

    pub fn bounds(&self) -> Size {
        self.size
    }

    /// Add on top of everything already attached.
    pub fn attach(&mut self, stamp: Stamp) -> StampKey {
        let key = self.stamps.insert(stamp);
        self.order.push(key);
        key
    }

    #[cfg(test)]
    pub fn get(&self, key: StampKey) -> Option<&Stamp> {
        self.stamps.get(key)
    }

    pub fn get_mut(&mut self, key: StampKey) -> Option<&mut Stamp> {
        self.stamps.get_mut(key)
    }

    pub fn detach(&mut self, key: StampKey) -> Option<Stamp> {
        let stamp = self.stamps.remove(key)?;
        self.order.retain(|k| *k != key);
        Some(stamp)
    }

    #[cfg(test)]
    pub fn contains(&self, key: StampKey) -> bool {
        self.stamps.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Stamps bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Stamp> {
        self.order.iter().filter_map(|k| self.stamps.get(*k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageResource, Point};
    use image::RgbaImage;

    fn stamp(name: &str) -> Stamp {
        let img = ImageResource::new(name, RgbaImage::new(2, 2));
        Stamp::new(img, Point::new(1.0, 1.0))
    }

    #[test]
    fn test_attach_detach_keeps_paint_order() {
        let mut surface = Surface::new(100, 50);
        let a = surface.attach(stamp("a"));
        let b = surface.attach(stamp("b"));
        let c = surface.attach(stamp("c"));
        assert_eq!(surface.len(), 3);

        assert!(surface.detach(b).is_some());
        assert!(!surface.contains(b));
        let names: Vec<&str> = surface.iter().map(|s| s.image().name()).collect();
        assert_eq!(names, vec!["a", "c"]);

        assert!(surface.detach(b).is_none());
        surface.detach(a);
        surface.detach(c);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_bounds_follow_construction() {
        let surface = Surface::new(640, 480);
        assert_eq!(surface.bounds(), Size { width: 640.0, height: 480.0 });
    }
}
