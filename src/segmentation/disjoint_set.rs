//! Concurrent union-find over a flat arena of per-pixel elements
//!
//! Parent links are atomic indices, so many workers can union neighboring
//! elements at once without locks. A union always hangs the larger root under
//! the smaller one, which keeps every parent index at or below its child's and
//! makes the representative of a set its smallest member.

use crate::error::{Error, Result};
use crate::models::{Normal, PointXyz};
use nalgebra::Vector3;
use std::sync::atomic::{AtomicU32, Ordering};

/// Handle to an element of a [`DisjointSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Arena offset (the pixel index)
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw id value
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Local plane estimate carried by each element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneDescriptor {
    /// Unit normal, NaN when the pixel has none
    pub normal: Vector3<f32>,
    /// Plane offset `-n · p`
    pub offset: f32,
}

impl PlaneDescriptor {
    /// Descriptor of the tangent plane at `point`
    pub fn new(point: &PointXyz, normal: &Normal) -> Self {
        if !normal.is_valid() {
            return Self::invalid();
        }
        Self {
            normal: normal.normal,
            offset: -normal.normal.dot(&point.coords),
        }
    }

    /// Descriptor for pixels without a usable normal
    pub fn invalid() -> Self {
        Self {
            normal: Vector3::new(f32::NAN, f32::NAN, f32::NAN),
            offset: f32::NAN,
        }
    }

    /// True when normal and offset are finite
    pub fn is_valid(&self) -> bool {
        self.offset.is_finite() && self.normal.iter().all(|c| c.is_finite())
    }

    /// Whether two local planes agree within the given tolerances
    pub fn agrees(&self, other: &Self, cos_tolerance: f32, distance_tolerance: f32) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.normal.dot(&other.normal) > cos_tolerance
            && (self.offset - other.offset).abs() < distance_tolerance
    }
}

struct Element {
    parent: AtomicU32,
    descriptor: PlaneDescriptor,
}

/// Arena of union-find elements indexed by pixel offset
pub struct DisjointSet {
    elements: Vec<Element>,
}

impl DisjointSet {
    /// Largest number of elements an arena can hold
    pub const MAX_LEN: usize = u32::MAX as usize;

    /// One singleton set per descriptor
    pub fn new(descriptors: Vec<PlaneDescriptor>) -> Result<Self> {
        check_capacity(descriptors.len())?;
        let elements = descriptors
            .into_iter()
            .enumerate()
            .map(|(i, descriptor)| Element {
                parent: AtomicU32::new(i as u32),
                descriptor,
            })
            .collect();
        Ok(Self { elements })
    }

    /// `n` singletons without plane data
    pub fn with_len(n: usize) -> Result<Self> {
        check_capacity(n)?;
        Self::new(vec![PlaneDescriptor::invalid(); n])
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when the arena is empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Checked handle for `index`
    pub fn element(&self, index: usize) -> Result<ElementId> {
        if index >= self.elements.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.elements.len(),
            });
        }
        Ok(ElementId(index as u32))
    }

    /// Plane descriptor of an element
    pub fn descriptor(&self, id: ElementId) -> &PlaneDescriptor {
        &self.elements[id.index()].descriptor
    }

    #[inline]
    fn parent(&self, x: u32) -> u32 {
        self.elements[x as usize].parent.load(Ordering::Acquire)
    }

    /// Representative of the set containing `id`
    ///
    /// Compresses the path by halving as it walks; safe to call concurrently
    /// with other finds and unions.
    pub fn find(&self, id: ElementId) -> ElementId {
        let mut x = id.0;
        loop {
            let p = self.parent(x);
            if p == x {
                return ElementId(x);
            }
            let grandparent = self.parent(p);
            if grandparent != p {
                // Losing this race only skips one compression step
                let _ = self.elements[x as usize].parent.compare_exchange(
                    p,
                    grandparent,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                );
            }
            x = p;
        }
    }

    /// Representative of the element at `index`, or `IndexOutOfRange`
    pub fn find_index(&self, index: usize) -> Result<ElementId> {
        Ok(self.find(self.element(index)?))
    }

    /// Merge the sets containing `a` and `b`; false if already joined
    pub fn union(&self, a: ElementId, b: ElementId) -> bool {
        loop {
            let ra = self.find(a);
            let rb = self.find(b);
            if ra == rb {
                return false;
            }
            let (child, root) = if ra > rb { (ra, rb) } else { (rb, ra) };
            // Only succeeds while `child` is still a root
            if self.elements[child.index()]
                .parent
                .compare_exchange(child.0, root.0, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
    }

    /// True when `a` and `b` share a representative
    pub fn same_set(&self, a: ElementId, b: ElementId) -> bool {
        self.find(a) == self.find(b)
    }

    /// Representative id of every element, in arena order
    pub fn roots(&self) -> Vec<u32> {
        (0..self.elements.len() as u32)
            .map(|i| self.find(ElementId(i)).0)
            .collect()
    }

    /// Number of distinct sets
    pub fn set_count(&self) -> usize {
        (0..self.elements.len() as u32)
            .filter(|&i| self.parent(i) == i)
            .count()
    }
}

fn check_capacity(len: usize) -> Result<()> {
    if len > DisjointSet::MAX_LEN {
        return Err(Error::TooManyElements {
            len,
            max: DisjointSet::MAX_LEN,
        });
    }
    Ok(())
}
