mod refine;
