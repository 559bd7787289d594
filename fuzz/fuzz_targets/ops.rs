#![no_main]

use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use rsradix::RadixTree;
use std::collections::HashMap;

#[derive(Arbitrary, Debug)]
pub enum Ops {
    Insert(String, u8),
    Delete(String),
    Get(String),
    Defragment,
    RemoveEntry(String),
    Set(String, Option<u8>),
}

fuzz_target!(|data: Vec<Ops>| {
    let mut tree = RadixTree::<u8>::new();

    let mut twin = HashMap::<String, u8>::new();

    for datum in data {
        match datum {
            Ops::Insert(key, value) => {
                assert_eq!(tree.insert(&key, value), twin.insert(key, value));
            }
            Ops::Delete(key) => {
                // The empty key is never removed.
                let expected = if key.is_empty() { None } else { twin.remove(&key) };
                assert_eq!(tree.remove(&key), expected);
            }
            Ops::RemoveEntry(key) => {
                let expected = if key.is_empty() { None } else { twin.remove_entry(&key) };
                assert_eq!(tree.remove_entry(&key), expected);
            }
            Ops::Get(key) => {
                assert_eq!(tree.get(&key), twin.get(&key));
            }
            Ops::Set(key, value) => {
                tree.set(&key, value);
                if let Some(value) = value {
                    twin.insert(key, value);
                }
            }
            Ops::Defragment => {
                tree.shrink_to_fit();
            }
        }

        assert_eq!(tree.len(), twin.len());
        tree.check_well_formed().unwrap();
    }
});
