use pipesim_core::Program;
use pipesim_core::isa::{AluOp, BranchCond, Instruction, MemOperand};

/// Builds a [`Program`] one typed instruction at a time.
///
/// Branch and jump targets are instruction indices.
#[derive(Clone, Debug, Default)]
pub struct ProgramBuilder {
    insts: Vec<Instruction>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, inst: Instruction) -> Self {
        self.insts.push(inst);
        self
    }

    /// Index the next instruction will get.
    pub fn here(&self) -> usize {
        self.insts.len()
    }

    pub fn build(self) -> Program {
        Program::from_instructions(&self.insts).unwrap()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.insts
    }

    // --- ALU ---

    fn alu_reg(self, op: AluOp, rd: usize, rs: usize, rt: usize) -> Self {
        self.push(Instruction::AluReg { op, rd, rs, rt })
    }

    fn alu_imm(self, op: AluOp, rd: usize, rs: usize, imm: i32) -> Self {
        self.push(Instruction::AluImm { op, rd, rs, imm })
    }

    pub fn add(self, rd: usize, rs: usize, rt: usize) -> Self {
        self.alu_reg(AluOp::Add, rd, rs, rt)
    }

    pub fn sub(self, rd: usize, rs: usize, rt: usize) -> Self {
        self.alu_reg(AluOp::Sub, rd, rs, rt)
    }

    pub fn mul(self, rd: usize, rs: usize, rt: usize) -> Self {
        self.alu_reg(AluOp::Mul, rd, rs, rt)
    }

    pub fn slt(self, rd: usize, rs: usize, rt: usize) -> Self {
        self.alu_reg(AluOp::Slt, rd, rs, rt)
    }

    pub fn addi(self, rd: usize, rs: usize, imm: i32) -> Self {
        self.alu_imm(AluOp::Add, rd, rs, imm)
    }

    pub fn ori(self, rd: usize, rs: usize, imm: i32) -> Self {
        self.alu_imm(AluOp::Or, rd, rs, imm)
    }

    pub fn sll(self, rd: usize, rs: usize, shamt: i32) -> Self {
        self.alu_imm(AluOp::Sll, rd, rs, shamt)
    }

    // --- Memory ---

    pub fn lw(self, rt: usize, offset: i32, base: usize) -> Self {
        self.push(Instruction::Load {
            rt,
            addr: MemOperand { base, offset },
        })
    }

    pub fn sw(self, rt: usize, offset: i32, base: usize) -> Self {
        self.push(Instruction::Store {
            rt,
            addr: MemOperand { base, offset },
        })
    }

    // --- Control ---

    pub fn beq(self, rs: usize, rt: usize, target: usize) -> Self {
        self.push(Instruction::Branch {
            cond: BranchCond::Eq,
            rs,
            rt,
            target,
        })
    }

    pub fn bne(self, rs: usize, rt: usize, target: usize) -> Self {
        self.push(Instruction::Branch {
            cond: BranchCond::Ne,
            rs,
            rt,
            target,
        })
    }

    pub fn j(self, target: usize) -> Self {
        self.push(Instruction::Jump { target })
    }
}
