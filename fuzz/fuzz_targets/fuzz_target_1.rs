#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use rsradix::RadixTree;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    let Ok(mut tree) = RadixTree::<u64>::arbitrary(&mut unstructured) else {
        return;
    };
    let (Ok(key), Ok(value)) = (
        String::arbitrary(&mut unstructured),
        u64::arbitrary(&mut unstructured),
    ) else {
        return;
    };

    tree.insert(&key, value);
    assert_eq!(tree.get(&key), Some(&value));
    tree.check_well_formed().unwrap();
});
