use std::io::Cursor;

use crate::menu::Menu;
use crate::ost::Ost;

fn run_session(input: &str, show_tree: bool) -> (Ost, String) {
    let mut ost = Ost::new("menu-test");
    let mut menu = Menu::new(Cursor::new(input.as_bytes()), Vec::new(), show_tree);
    menu.run(&mut ost).unwrap();
    let output = String::from_utf8(menu.into_output()).unwrap();
    (ost, output)
}

#[test]
fn test_insert() {
    let (ost, output) = run_session("1 10\n1 20\n1 30\n5\n", true);
    assert_eq!(ost.preorder(), vec![20, 10, 30]);
    assert_eq!(output.matches("Key inserted successfully!").count(), 3);
    assert!(output.contains("Current status of the tree: \n10\n"));
    assert!(output.contains("Current status of the tree: \n20 10 30\n"));
    assert!(output.starts_with("Enter the operation that you want to perform:\n1) Insert"));
}

#[test]
fn test_queries() {
    let input = "1\n5\n1\n3\n1 8\n3 8\n3 4\n4 1\n4 3\n4 0\n4 -2\n";
    let (ost, output) = run_session(input, false);
    assert_eq!(ost.inorder(), vec![3, 5, 8]);
    assert!(output.contains("The rank of 8 is 3"));
    assert!(output.contains("Key not found in the tree!"));
    assert!(output.contains("The key with rank 1 is 3"));
    assert_eq!(
        output
            .matches("No node with the given rank exists in the tree!")
            .count(),
        2
    );
    assert!(output.contains("The key with rank 3 is 8"));
    assert!(!output.contains("Current status"));
}

#[test]
fn test_delete() {
    let (ost, output) = run_session("1 5 1 3 1 8 2 3 2 42\n", true);
    assert_eq!(ost.inorder(), vec![5, 8]);
    assert_eq!(output.matches("Key deleted successfully!").count(), 2);
    assert!(output.contains("Current status of the tree: \n5 8\n"));
}

#[test]
fn test_invalid() {
    let (ost, output) = run_session("9\nx\n1 abc\n1 7\n5\n1 99\n", true);
    assert_eq!(ost.inorder(), vec![7]);
    assert_eq!(output.matches("Invalid Operation!").count(), 2);
    assert_eq!(output.matches("Invalid input!").count(), 1);
}

#[test]
fn test_end_of_input() {
    let (ost, output) = run_session("1 4\n1", true);
    assert_eq!(ost.inorder(), vec![4]);
    assert!(output.ends_with("Enter the key that you want to insert: "));

    let (ost, _) = run_session("", true);
    assert!(ost.is_empty());
}
