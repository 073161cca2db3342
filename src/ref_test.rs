// Reference index, a presence bitmap over keys 0..capacity.
struct RefNodes {
    entries: Vec<bool>,
}

impl RefNodes {
    fn new(capacity: usize) -> RefNodes {
        RefNodes {
            entries: vec![false; capacity],
        }
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|present| **present).count()
    }

    fn contains(&self, key: i64) -> bool {
        self.entries[key as usize]
    }

    fn insert(&mut self, key: i64) -> bool {
        let entry = &mut self.entries[key as usize];
        let inserted = !*entry;
        *entry = true;
        inserted
    }

    fn delete(&mut self, key: i64) -> bool {
        let entry = &mut self.entries[key as usize];
        let deleted = *entry;
        *entry = false;
        deleted
    }

    fn rank_of_key(&self, key: i64) -> Option<usize> {
        if self.contains(key) {
            let below = &self.entries[..=(key as usize)];
            Some(below.iter().filter(|present| **present).count())
        } else {
            None
        }
    }

    fn find_by_rank(&self, rank: usize) -> Option<i64> {
        match rank {
            0 => None,
            rank => self.iter().nth(rank - 1),
        }
    }

    fn iter(&self) -> std::vec::IntoIter<i64> {
        self.range(Bound::Unbounded, Bound::Unbounded)
    }

    fn range(&self, low: Bound<i64>, high: Bound<i64>) -> std::vec::IntoIter<i64> {
        self.slice(low, high)
            .collect::<Vec<i64>>()
            .into_iter()
    }

    fn reverse(&self, low: Bound<i64>, high: Bound<i64>) -> std::vec::IntoIter<i64> {
        self.slice(low, high)
            .rev()
            .collect::<Vec<i64>>()
            .into_iter()
    }

    fn slice<'a>(
        &'a self,
        low: Bound<i64>,
        high: Bound<i64>,
    ) -> impl DoubleEndedIterator<Item = i64> + 'a {
        let low = match low {
            Bound::Included(low) => low as usize,
            Bound::Excluded(low) => (low + 1) as usize,
            Bound::Unbounded => 0,
        };
        let high = match high {
            Bound::Included(high) => (high + 1) as usize,
            Bound::Excluded(high) => high as usize,
            Bound::Unbounded => self.entries.len(),
        };
        let ok = low < self.entries.len();
        let ok = ok && (high >= low && high <= self.entries.len());
        let (low, high) = if ok { (low, high) } else { (0, 0) };

        self.entries[low..high]
            .iter()
            .enumerate()
            .filter(|(_, present)| **present)
            .map(move |(off, _)| (low + off) as i64)
    }
}

fn random_low_high(size: usize) -> (Bound<i64>, Bound<i64>) {
    let size = size as u64;
    let low = (random::<u64>() % size) as i64;
    let high = (random::<u64>() % size) as i64;
    let low = match random::<u8>() % 3 {
        0 => Bound::Included(low),
        1 => Bound::Excluded(low),
        2 => Bound::Unbounded,
        _ => unreachable!(),
    };
    let high = match random::<u8>() % 3 {
        0 => Bound::Included(high),
        1 => Bound::Excluded(high),
        2 => Bound::Unbounded,
        _ => unreachable!(),
    };
    (low, high)
}
