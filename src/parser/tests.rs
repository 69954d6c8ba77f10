use super::*;
use crate::labels::populate;
use crate::lexer::tokenize;

fn assemble(source: &str) -> EmitResult {
    let mut lexed = tokenize(source);
    assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
    let (table, label_errors) = populate(&mut lexed.tokens);
    assert!(label_errors.is_empty(), "label errors: {:?}", label_errors);
    emit(&lexed.tokens, &table)
}

#[test]
fn e1_immediate_halt() {
    let result = assemble("fi");
    assert!(result.errors.is_empty());
    assert_eq!(result.words, vec![27]);
}

#[test]
fn e2_echo_one_char_shape() {
    let result = assemble(
        "pl [1]d inp pl [0]d mar pl [0]d mch ld pl [2]d mch st fi",
    );
    assert!(result.errors.is_empty());
    assert_eq!(
        result.words,
        vec![
            0, 1, 1, // pl 1 inp
            0, 0, 1, // pl 0 mar
            0, 0, 0, // pl 0 mch
            3, // ld
            0, 2, 0, // pl 2 mch
            2, // st
            27, // fi
        ]
    );
}

#[test]
fn e3_accumulator_arithmetic_words() {
    let result = assemble("pl [3]d acc pl [4]d dat a+ fi");
    assert!(result.errors.is_empty());
    assert_eq!(result.words, vec![0, 3, 3, 0, 4, 4, 7, 27]);
}

#[test]
fn e4_label_resolution_is_self_loop() {
    let result = assemble("start: pl [5]d acc jm start fi");
    assert!(result.errors.is_empty());
    // start resolves to 0: pl(0) 5(1) acc(2) jm(3) 0(4) fi(5)
    assert_eq!(result.words, vec![0, 5, 3, 4, 0, 27]);
}

#[test]
fn e5_string_emission() {
    let result = assemble("msg: [Hi\\n]s fi");
    assert!(result.errors.is_empty());
    assert_eq!(result.words, vec!['H' as u64, 'i' as u64, 0x0A, 27]);
}

#[test]
fn e6_call_and_return_shape() {
    let result = assemble("cl sub fi sub: pl [42]d acc rt");
    assert!(result.errors.is_empty());
    // cl(0) sub->3(1) fi(2) pl(3) 42(4) acc(5) rt(6)
    assert_eq!(result.words, vec![25, 3, 27, 0, 42, 3, 26]);
}

#[test]
fn unrecognised_label_is_reported_and_not_emitted() {
    let result = assemble("jm nowhere fi");
    assert_eq!(result.errors.len(), 1);
    // jm(4) is emitted, but the unresolved operand is skipped entirely.
    assert_eq!(result.words, vec![4, 27]);
}

#[test]
fn builtin_register_names_resolve_as_labels() {
    let result = assemble("mv acc dat fi");
    assert!(result.errors.is_empty());
    assert_eq!(result.words, vec![1, 3, 4, 27]);
}
