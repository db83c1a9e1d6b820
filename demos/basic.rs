//! Basic use of a piece trie as an ordered map
use piece_trie::{Error, PushChar, StringTrie, Trie};

fn main() -> Result<(), Error> {
    // Create a new trie with string keys split into chars
    let mut trie: StringTrie<i32> = Trie::new(PushChar);

    // Insert some values
    trie.emplace("gsd", 42);
    trie.emplace("whispy", 69);
    trie.emplace("xazax", 1337);

    // An existing key keeps its value
    let (_, inserted) = trie.emplace("gsd", 43);
    assert!(!inserted);

    // Prefixes of stored keys are keys of their own
    trie.emplace("gs", -24);
    trie.emplace("abel", 16);

    // Check values
    assert_eq!(trie.at("gsd")?, &42);
    assert_eq!(trie.get("gs"), Some(&-24));
    assert_eq!(trie.count("missing"), 0);
    assert_eq!(trie.at("missing"), Err(Error::NotFound));

    *trie.at_mut("gsd")? += 1;

    // Entries come out in ascending key order
    for (key, value) in &trie {
        println!("{} -> {}", key, value);
    }

    // Walk with a cursor instead
    let mut cursor = trie.find("gsd");
    while !cursor.is_end() {
        let entry = trie.entry(cursor)?;
        println!("from gsd: {:?}", entry);
        trie.advance(&mut cursor)?;
    }

    // Removing a prefix keeps the longer keys
    trie.erase("gs");
    assert!(trie.contains_key("gsd"));
    println!("{:?}", trie);

    Ok(())
}
