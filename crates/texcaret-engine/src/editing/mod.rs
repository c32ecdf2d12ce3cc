/*!
 * # Editing Core Module
 *
 * The state container at the heart of the editor. Key principles:
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The entire buffer lives in one **`xi_rope::Rope`**
 * - Edits are **Delta**s; saving writes rope bytes verbatim, no drift
 *
 * ### 2. Command-Based Editing
 * - Every mutation is a **Command** (`Cmd`) compiled to a Delta
 * - Commands apply atomically: buffer, selection, and derived cursor
 *   context are replaced together in one state transition
 *
 * ### 3. Parse Per Edit
 * - After each applied command the buffer is re-parsed from scratch and
 *   the cursor context re-resolved against the fresh tree
 * - Buffers are editor-sized (hundreds to low thousands of bytes), so a
 *   full parse fits comfortably in an input-event handling slice
 *
 * ### 4. Instance-Scoped Observers
 * - Each `Document` owns its observer list; diagnostic [`EditorEvent`]s
 *   fan out synchronously and never cross editor instances
 *
 * [`EditorEvent`]: crate::events::EditorEvent
 *
 * ## Module Structure
 *
 * - **`document`**: the `Document` type and the high-level operations
 *   (typing, shortcut expansion, navigation) the host binds to keys
 * - **`commands`**: `Cmd` enum, delta compilation, selection transforms
 * - **`patch`**: edit result metadata (changed ranges, new selection)
 */

pub mod commands;
pub mod document;
pub mod patch;

pub use commands::Cmd;
pub use document::Document;
pub use patch::Patch;
