use rsradix::RadixTree;

#[derive(Debug)]
pub enum Value {
    A,
    B,
    C,
    D,
}

pub fn main() {
    let mut tree = RadixTree::<Value>::new();
    tree.insert("wolf", Value::A);
    tree.insert("world", Value::B);
    tree.insert("bear", Value::C);
    tree.insert("wacker", Value::D);

    println!("Wolf: {:?}", tree.get("wolf").unwrap());
    println!("Wo: {:?}", tree.get("wo"));

    tree.remove("wolf");
    println!("Tree after removing wolf: {:?}", tree);
}
