//! Source renderer - Wadler-style pretty printing of generated mappings
//!
//! Turns [`MappingFunction`]s and [`Expr`] fragments into Kotlin-flavoured source
//! text with the `pretty` crate. Each mapping becomes an extension function whose
//! body binds the receiver to the declaration's source parameter:
//!
//! ```text
//! fun com.example.User.toUserDto(): com.example.UserDto = let { source ->
//!     com.example.UserDto(id = source.id).apply {
//!         age = source.age
//!     }
//! }
//! ```

use crate::config::OutputSection;
use pretty::{DocAllocator, DocBuilder, RcAllocator};
use recast_core::code::{AssignTarget, Construction, PropertyAssignment, WhenArm, WhenPattern};
use recast_core::rules::template::PLACEHOLDER;
use recast_core::{Expr, MappingFunction};

/// Default line width for pretty printing
pub const DEFAULT_WIDTH: usize = 100;

/// Default indentation level
pub const DEFAULT_INDENT: usize = 4;

type Doc<'a> = DocBuilder<'a, RcAllocator, ()>;

/// Renders code fragments at a fixed width and indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    width: usize,
    indent: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new(DEFAULT_WIDTH, DEFAULT_INDENT)
    }
}

impl Renderer {
    pub fn new(width: usize, indent: usize) -> Self {
        Renderer { width, indent }
    }

    pub fn from_config(output: &OutputSection) -> Self {
        Renderer::new(output.width, output.indent)
    }

    /// Render a complete generated file: header comment plus the function.
    pub fn render_file(&self, function: &MappingFunction) -> crate::Result<String> {
        let mut text = comment(&format!(
            "Generated by recast: {} -> {}",
            function.source, function.target
        ));
        text.push('\n');
        text.push('\n');
        text.push_str(&self.render_function(function)?);
        text.push('\n');
        Ok(text)
    }

    pub fn render_function(&self, function: &MappingFunction) -> crate::Result<String> {
        let alloc = RcAllocator;
        let printer = MappingPrinter::new(&alloc, self.indent);
        self.layout(printer.function(function))
    }

    pub fn render_expr(&self, expr: &Expr) -> crate::Result<String> {
        let alloc = RcAllocator;
        let printer = MappingPrinter::new(&alloc, self.indent);
        self.layout(printer.expr(expr))
    }

    fn layout(&self, doc: Doc<'_>) -> crate::Result<String> {
        let mut output = Vec::new();
        doc.render(self.width, &mut output)?;
        Ok(String::from_utf8(output)?)
    }
}

/// Generate a line comment
pub fn comment(text: &str) -> String {
    format!("// {}", text)
}

/// Pretty printer for mapping fragments
struct MappingPrinter<'a> {
    alloc: &'a RcAllocator,
    indent: isize,
}

impl<'a> MappingPrinter<'a> {
    fn new(alloc: &'a RcAllocator, indent: usize) -> Self {
        MappingPrinter {
            alloc,
            indent: isize::try_from(indent).unwrap_or(DEFAULT_INDENT as isize),
        }
    }

    fn text<S: Into<std::borrow::Cow<'a, str>>>(&self, s: S) -> Doc<'a> {
        self.alloc.text(s)
    }

    fn nil(&self) -> Doc<'a> {
        self.alloc.nil()
    }

    /// Soft break that disappears when the group fits
    fn soft(&self) -> Doc<'a> {
        self.alloc.line_()
    }

    fn line(&self) -> Doc<'a> {
        self.alloc.line()
    }

    fn hardline(&self) -> Doc<'a> {
        self.alloc.hardline()
    }

    fn join<I>(&self, docs: I, sep: Doc<'a>) -> Doc<'a>
    where
        I: IntoIterator<Item = Doc<'a>>,
    {
        self.alloc.intersperse(docs, sep)
    }

    fn parens(&self, doc: Doc<'a>) -> Doc<'a> {
        self.text("(").append(doc).append(self.text(")"))
    }

    /// `head {` + indented lines + `}` that always breaks
    fn block(&self, head: Doc<'a>, lines: Vec<Doc<'a>>) -> Doc<'a> {
        let body = self.join(lines, self.hardline());
        head.append(self.text(" {"))
            .append(self.hardline().append(body).nest(self.indent))
            .append(self.hardline())
            .append(self.text("}"))
    }

    // ========================================================================
    // Functions
    // ========================================================================

    fn function(&self, f: &MappingFunction) -> Doc<'a> {
        self.text(format!(
            "fun {}.{}(): {} = let {{ {} ->",
            f.source, f.name, f.target, f.parameter
        ))
        .append(
            self.hardline()
                .append(self.construction(&f.body))
                .nest(self.indent),
        )
        .append(self.hardline())
        .append(self.text("}"))
    }

    fn construction(&self, c: &Construction) -> Doc<'a> {
        let constructor = self.expr(&c.constructor);
        if c.assignments.is_empty() {
            return constructor;
        }
        let statements = c.assignments.iter().map(|a| self.statement(a)).collect();
        self.block(constructor.append(self.text(".apply")), statements)
    }

    fn statement(&self, a: &PropertyAssignment) -> Doc<'a> {
        match &a.target {
            AssignTarget::Property { name } => self
                .text(name.clone())
                .append(self.text(" = "))
                .append(self.expr(&a.value)),
            AssignTarget::Setter { method } => self
                .text(method.clone())
                .append(self.parens(self.expr(&a.value))),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn expr(&self, e: &Expr) -> Doc<'a> {
        match e {
            Expr::Variable { name } => self.text(name.clone()),
            Expr::Property {
                receiver,
                name,
                safe,
            } => self
                .atom(receiver)
                .append(self.text(dot(*safe)))
                .append(self.text(name.clone())),
            Expr::Call {
                receiver,
                function,
                args,
                safe,
            } => {
                let head = match receiver {
                    Some(receiver) => self.atom(receiver).append(self.text(dot(*safe))),
                    None => self.nil(),
                };
                head.append(self.text(function.clone()))
                    .append(self.arguments(args))
            }
            Expr::Construct { target, args } => {
                let args = args.iter().map(|a| {
                    self.text(format!("{} = ", a.name))
                        .append(self.expr(&a.value))
                });
                self.text(target.to_string()).append(self.call_parens(args.collect()))
            }
            Expr::Literal { text } => self.text(text.clone()),
            Expr::Raw { code } => self.text(code.clone()),
            Expr::Template { template, argument } => {
                let pieces = template
                    .split(PLACEHOLDER)
                    .map(|piece| self.text(piece.to_string()));
                self.join(pieces, self.atom(argument))
            }
            Expr::Null => self.text("null"),
            Expr::NotNull { value } => self.atom(value).append(self.text("!!")),
            Expr::SafeLet {
                subject,
                binding,
                body,
            } => self
                .atom(subject)
                .append(self.text("?.let "))
                .append(self.lambda(binding, body)),
            Expr::Lambda { parameter, body } => self.lambda(parameter, body),
            Expr::Pair { first, second } => self
                .atom(first)
                .append(self.text(" to "))
                .append(self.atom(second)),
            Expr::EnumValue { enum_type, variant } => {
                self.text(format!("{}.{}", enum_type, variant))
            }
            Expr::When { subject, arms } => {
                let head = self
                    .text("when ")
                    .append(self.parens(self.expr(subject)));
                let arms = arms.iter().map(|arm| self.when_arm(arm)).collect();
                self.block(head, arms)
            }
        }
    }

    /// An expression in receiver or operand position, parenthesized unless postfix-safe.
    fn atom(&self, e: &Expr) -> Doc<'a> {
        let wrap = match e {
            Expr::Raw { .. }
            | Expr::Template { .. }
            | Expr::Pair { .. }
            | Expr::When { .. }
            | Expr::Lambda { .. } => true,
            Expr::Literal { text } => text.starts_with('-') || text.contains(char::is_whitespace),
            _ => false,
        };
        if wrap {
            self.parens(self.expr(e))
        } else {
            self.expr(e)
        }
    }

    /// Call arguments; a final lambda goes after the parentheses.
    fn arguments(&self, args: &[Expr]) -> Doc<'a> {
        match args.split_last() {
            Some((Expr::Lambda { parameter, body }, rest)) => {
                let head = if rest.is_empty() {
                    self.nil()
                } else {
                    self.call_parens(rest.iter().map(|a| self.expr(a)).collect())
                };
                head.append(self.text(" "))
                    .append(self.lambda(parameter, body))
            }
            _ => self.call_parens(args.iter().map(|a| self.expr(a)).collect()),
        }
    }

    fn call_parens(&self, args: Vec<Doc<'a>>) -> Doc<'a> {
        if args.is_empty() {
            return self.text("()");
        }
        let sep = self.text(",").append(self.line());
        self.text("(")
            .append(self.soft().append(self.join(args, sep)).nest(self.indent))
            .append(self.soft())
            .append(self.text(")"))
            .group()
    }

    fn lambda(&self, parameter: &str, body: &Expr) -> Doc<'a> {
        self.text(format!("{{ {} ->", parameter))
            .append(self.line().append(self.expr(body)).nest(self.indent))
            .append(self.line())
            .append(self.text("}"))
            .group()
    }

    fn when_arm(&self, arm: &WhenArm) -> Doc<'a> {
        let pattern = match &arm.pattern {
            WhenPattern::Null => self.text("null"),
            WhenPattern::EnumValue { enum_type, variant } => {
                self.text(format!("{}.{}", enum_type, variant))
            }
        };
        pattern.append(self.text(" -> ")).append(self.expr(&arm.value))
    }
}

fn dot(safe: bool) -> &'static str {
    if safe { "?." } else { "." }
}
