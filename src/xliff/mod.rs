/*!
 * XLIFF document model.
 *
 * - `document`: generic element tree parsed with quick-xml, markup kept verbatim
 * - `unit`: translation units and the locale document built on top of it
 */

pub mod document;
pub mod unit;

pub use self::document::{Element, Node, NodePath, XmlDocument};
pub use self::unit::{TargetState, TranslationUnit, XliffDocument};
