mod structural;

pub use structural::StructuralDiffer;
