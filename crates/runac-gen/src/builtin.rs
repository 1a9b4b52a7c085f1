//! Builtin dispatch: maps a reserved [`BuiltinName`] to the runtime ABI
//! symbol it calls (§6.3) and the static type its result carries for
//! `Let`-inference and `Print` dispatch (§4.3).

use runac_lex::BuiltinName;
use runac_par::TypeRef;
use runac_util::Symbol;

/// The exact C symbol name emitted for a `BuiltinCall`. All of these are
/// runtime-library entry points, so call sites always use the `@PLT`
/// suffix (§4.4's "Runtime/list builtins use `@PLT` suffix").
pub fn abi_symbol(kind: BuiltinName) -> &'static str {
    use BuiltinName::*;
    match kind {
        ReadFile => "runtime_read_file",
        WriteFile => "runtime_write_file",
        StringLength => "string_length",
        StringCharAt => "string_char_at",
        StringSubstring => "string_substring",
        StringEquals => "string_equals",
        AsciiValueOf => "ascii_value_of",
        IsDigit => "is_digit",
        IsAlpha => "is_alpha",
        IsWhitespace => "is_whitespace",
        ListCreate => "list_create",
        ListAppend => "list_append",
        ListGet => "list_get",
        ListGetInteger => "list_get_integer",
        ListLength => "list_length",
        ListDestroy => "list_destroy",
        ListSet => "list_set",
        ListInsert => "list_insert",
        ListRemove => "list_remove",
        ListClear => "list_clear",
        ListFind => "list_find",
        ListSort => "list_sort",
        ListReverse => "list_reverse",
        ListCopy => "list_copy",
        ListMerge => "list_merge",
        StringConcat => "string_concat",
        StringCompare => "string_compare",
        StringToInteger => "string_to_integer",
        IntegerToString => "integer_to_string",
        StringFind => "string_find",
        StringReplace => "string_replace",
        StringTrim => "string_trim",
        StringSplit => "string_split",
        FileOpen => "runtime_file_open",
        FileClose => "runtime_file_close",
        FileReadLine => "runtime_file_read_line",
        FileWriteLine => "runtime_file_write_line",
        FileExists => "runtime_file_exists",
        FileDelete => "runtime_file_delete",
        FileSize => "runtime_file_size",
        FileSeek => "runtime_file_seek",
        FileTell => "runtime_file_tell",
        FileEof => "runtime_file_eof",
        Sin => "runtime_sin",
        Cos => "runtime_cos",
        Tan => "runtime_tan",
        Sqrt => "runtime_sqrt",
        Pow => "runtime_pow",
        Abs => "runtime_abs",
        Floor => "runtime_floor",
        Ceil => "runtime_ceil",
        Min => "runtime_min",
        Max => "runtime_max",
        Random => "runtime_random",
        Log => "runtime_log",
        Exp => "runtime_exp",
        // No direct ABI symbol: expanded inline, see `expr::emit_get_command_line_args`.
        GetCommandLineArgs => "get_command_line_arg",
        ExitWithCode => "exit_with_code",
        Panic => "panic",
        Assert => "assert",
        Allocate => "allocate",
        Deallocate => "deallocate",
    }
}

/// The static type a `BuiltinCall` evaluates to, per §4.3's `Let`-inference
/// table: the five string-producing builtins are `String`, the three
/// list-producing ones (`list_create`/`list_copy`/`list_merge`, exactly
/// §4.3's enumerated list — not `get_command_line_args`, which the table
/// never names) are a list value (tracked as a named pseudo-type so `Print`
/// still falls through to `print_integer` for it, matching "every other case
/// -> Integer" read literally for anything that isn't `String`), and
/// everything else, including `get_command_line_args`, is `Integer`.
pub fn return_type(kind: BuiltinName) -> TypeRef {
    use BuiltinName::*;
    match kind {
        ReadFile | StringSubstring | StringConcat | IntegerToString | StringReplace | StringTrim => {
            TypeRef::String
        }
        ListCreate | ListCopy | ListMerge => TypeRef::Named(Symbol::intern("List")),
        _ => TypeRef::Integer,
    }
}
