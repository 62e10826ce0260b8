error_chain! {
    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        UnexpectedEOF
        MalformedHeader

        UnsupportedKind(kind: String) {
            description("unsupported object kind")
            display("unsupported object kind: '{}'", kind)
        }

        MalformedTree(reason: String) {
            description("malformed tree")
            display("malformed tree: {}", reason)
        }

        MissingRequiredField(field: &'static str) {
            description("missing required field")
            display("missing required field '{}'", field)
        }

        MalformedHash(text: String) {
            description("malformed hash")
            display("malformed hash: '{}'", text)
        }

        MalformedPersonLine(line: String) {
            description("malformed person line")
            display("malformed person line: '{}'", line)
        }

        MalformedCommit(reason: String) {
            description("malformed commit")
            display("malformed commit: {}", reason)
        }

        MalformedTag(reason: String) {
            description("malformed tag")
            display("malformed tag: {}", reason)
        }

        LengthMismatch(declared: u64, actual: u64) {
            description("object length does not match its header")
            display("header declares {} bytes, body has {}", declared, actual)
        }
    }
}
