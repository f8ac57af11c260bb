use crate::types::{Category, MAX_CATEGORIES};

/// Symmetric enable/disable relation over category pairs.
///
/// Row `i` holds one bit per category `j`; every update writes both `(i, j)` and `(j, i)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryFilter {
    rows: [u32; MAX_CATEGORIES as usize],
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryFilter {
    /// Every pair starts disabled.
    pub fn new() -> Self {
        Self { rows: [0; MAX_CATEGORIES as usize] }
    }

    pub fn enable_pair(&mut self, a: Category, b: Category) {
        self.rows[a.ordinal() as usize] |= b.bit();
        self.rows[b.ordinal() as usize] |= a.bit();
    }

    pub fn disable_pair(&mut self, a: Category, b: Category) {
        self.rows[a.ordinal() as usize] &= !b.bit();
        self.rows[b.ordinal() as usize] &= !a.bit();
    }

    pub fn allows(&self, a: Category, b: Category) -> bool {
        self.rows[a.ordinal() as usize] & b.bit() != 0
    }

    pub fn clear(&mut self) {
        self.rows = [0; MAX_CATEGORIES as usize];
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| *r == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_enable_disable() {
        let (bullet, wall) = (Category::of(1), Category::of(7));
        let mut f = CategoryFilter::new();
        assert!(!f.allows(bullet, wall));

        f.enable_pair(bullet, wall);
        assert!(f.allows(bullet, wall));
        assert!(f.allows(wall, bullet));
        assert!(!f.allows(bullet, bullet));

        f.disable_pair(wall, bullet);
        assert!(!f.allows(bullet, wall));
        assert!(f.is_empty());
    }

    #[test]
    fn test_idempotent_and_self_pairs() {
        let a = Category::of(31);
        let mut f = CategoryFilter::new();
        f.enable_pair(a, a);
        f.enable_pair(a, a);
        assert!(f.allows(a, a));
        f.disable_pair(a, a);
        f.disable_pair(a, a);
        assert!(!f.allows(a, a));
    }

    #[test]
    fn test_symmetry_over_all_pairs() {
        let mut f = CategoryFilter::new();
        for i in (0..MAX_CATEGORIES).step_by(3) {
            f.enable_pair(Category::of(i), Category::of((i * 7) % MAX_CATEGORIES));
        }
        for i in 0..MAX_CATEGORIES {
            for j in 0..MAX_CATEGORIES {
                assert_eq!(
                    f.allows(Category::of(i), Category::of(j)),
                    f.allows(Category::of(j), Category::of(i))
                );
            }
        }
        f.clear();
        assert!(f.is_empty());
    }
}
