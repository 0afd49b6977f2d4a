/// Deterministic mulberry32-style generator. Maze generation and the offline
/// simulator both take an explicit seed so a run can be reproduced exactly.
#[derive(Clone, Debug)]
pub struct Rng {
    seed: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn next_f32(&mut self) -> f32 {
        self.seed = self.seed.wrapping_add(0x6d2b79f5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        let out = t ^ (t >> 14);
        (out as f64 / 4_294_967_296.0) as f32
    }

    pub fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_f32() * len as f32).floor().min((len - 1) as f32) as usize
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        Some(&items[self.pick_index(items.len())])
    }

    /// Fisher-Yates, used to randomize carving direction order.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.pick_index(i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_produces_same_sequence() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..64 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn pick_index_stays_in_bounds() {
        let mut rng = Rng::new(7);
        for len in 1..20usize {
            for _ in 0..100 {
                assert!(rng.pick_index(len) < len);
            }
        }
    }

    #[test]
    fn pick_returns_none_on_empty_slice() {
        let mut rng = Rng::new(1);
        let empty: [i32; 0] = [];
        assert_eq!(rng.pick(&empty), None);
    }

    #[test]
    fn shuffle_keeps_all_elements() {
        let mut rng = Rng::new(99);
        let mut values: Vec<i32> = (0..32).collect();
        rng.shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..32).collect::<Vec<_>>());
    }
}
