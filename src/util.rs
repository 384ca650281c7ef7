
pub mod dna {

    const fn comp_base_impl(base: u8) -> u8 {
        match base {
            b'A' => b'T',
            b'G' => b'C',
            b'C' => b'G',
            b'T' => b'A',
            b'a' => b't',
            b'g' => b'c',
            b'c' => b'g',
            b't' => b'a',
            _ => b'N',
        }
    }

    const fn comp_base_table() -> [u8; 256] {
        let mut i = 0;
        let mut table: [u8; 256] = [0; 256];
        while i <= 255 {
            table[i] = comp_base_impl(i as u8);
            i += 1;
        }
        table
    }

    const DNA_COMP_TABLE: [u8; 256] = comp_base_table();

    /// Retrieves the DNA complement for the provided base using a
    /// lookup-table built at compile time.
    #[inline]
    pub const fn comp_base(base: u8) -> u8 {
        DNA_COMP_TABLE[base as usize]
    }

    /// Calculates the reverse complement for a sequence provided as a
    /// double-ended iterator.
    #[inline]
    pub fn rev_comp<I, B>(seq: I) -> Vec<u8>
    where
        B: std::borrow::Borrow<u8>,
        I: IntoIterator<Item = B>,
        I::IntoIter: DoubleEndedIterator,
    {
        seq.into_iter()
            .rev()
            .map(|b| comp_base(*b.borrow()))
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        use quickcheck::{Arbitrary, Gen, QuickCheck};

        #[derive(Debug, Clone, Copy)]
        struct Base(u8);

        impl Arbitrary for Base {
            fn arbitrary<G: Gen>(g: &mut G) -> Base {
                let bases = b"ACGTacgt";
                Base(bases[usize::arbitrary(g) % bases.len()])
            }
        }

        fn is_comp_isomorphic(b: Base) -> bool {
            comp_base(comp_base(b.0)) == b.0
        }

        fn is_rev_comp_isomorphic(seq: Vec<Base>) -> bool {
            let seq: Vec<u8> = seq.into_iter().map(|b| b.0).collect();
            rev_comp(rev_comp(&seq)) == seq
        }

        #[test]
        fn comp_isomorphic() {
            QuickCheck::new()
                .tests(1000)
                .quickcheck(is_comp_isomorphic as fn(Base) -> bool);
        }

        #[test]
        fn rev_comp_isomorphic() {
            QuickCheck::new()
                .tests(1000)
                .quickcheck(is_rev_comp_isomorphic as fn(Vec<Base>) -> bool);
        }

        #[test]
        fn unknown_bases_become_n() {
            assert_eq!(comp_base(b'X'), b'N');
            assert_eq!(rev_comp(b"GATTACA"), b"TGTAATC".to_vec());
        }
    }
}
